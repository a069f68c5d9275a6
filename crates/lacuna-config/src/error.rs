//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading a config file
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not map to a supported format
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// The file content could not be deserialized
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        /// Format name (toml, yaml, json)
        format: &'static str,
        /// Deserializer message
        message: String,
    },

    /// The configuration deserialized but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Specialized Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a validation error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::invalid("anchor prefix must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: anchor prefix must not be empty"
        );

        let err = ConfigError::Parse {
            format: "toml",
            message: "expected `=`".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to parse toml config: expected `=`");
    }
}
