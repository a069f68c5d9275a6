//! Core error types
//!
//! Parsing and synchronization never fail: they report diagnostics inside their
//! results. Only document I/O and frontmatter re-encoding can produce an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by document operations
#[derive(Debug, Error)]
pub enum LacunaError {
    /// IO error reading or writing a document
    #[error("IO error on {path}: {source}")]
    Io {
        /// Document path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Frontmatter could not be decoded for a transform
    #[error("Frontmatter parse error: {0}")]
    Frontmatter(String),

    /// Frontmatter could not be re-encoded after a transform
    #[error("Frontmatter encode error: {0}")]
    Encode(String),

    /// Caller supplied an argument the operation cannot use
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for Lacuna operations
pub type Result<T> = std::result::Result<T, LacunaError>;

impl LacunaError {
    /// Create a frontmatter decode error
    pub fn frontmatter(msg: impl Into<String>) -> Self {
        Self::Frontmatter(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_yaml::Error> for LacunaError {
    fn from(err: serde_yaml::Error) -> Self {
        LacunaError::Encode(err.to_string())
    }
}
