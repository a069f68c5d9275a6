//! Configuration file loading

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::StubsConfig;
use crate::error::{ConfigError, ConfigResult};

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Pick a format from a file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::UnsupportedFormat(if other.is_empty() {
                path.display().to_string()
            } else {
                other.to_string()
            })),
        }
    }
}

/// Loads [`StubsConfig`] from files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default location: `~/.config/lacuna/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lacuna").join("config.toml"))
    }

    /// Load and validate a config file
    pub async fn load_from_file(path: impl AsRef<Path>) -> ConfigResult<StubsConfig> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::load_from_str(&content, format)?;
        info!(path = %path.display(), types = config.stub_types.len(), "Loaded stub configuration");
        Ok(config)
    }

    /// Load the explicit path if given, else the default path if it exists, else defaults
    pub async fn load_or_default(path: Option<&Path>) -> ConfigResult<StubsConfig> {
        if let Some(path) = path {
            return Self::load_from_file(path).await;
        }

        match Self::default_config_path() {
            Some(default_path) if tokio::fs::try_exists(&default_path).await.unwrap_or(false) => {
                Self::load_from_file(&default_path).await
            }
            _ => {
                debug!("No config file found, using built-in stub configuration");
                Ok(StubsConfig::default())
            }
        }
    }

    /// Parse and validate config text
    pub fn load_from_str(content: &str, format: ConfigFormat) -> ConfigResult<StubsConfig> {
        let config: StubsConfig = match format {
            ConfigFormat::Toml => Self::parse_toml(content)?,
            ConfigFormat::Yaml => Self::parse_yaml(content)?,
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| ConfigError::Parse {
                format: "json",
                message: e.to_string(),
            })?,
        };
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "toml")]
    fn parse_toml(content: &str) -> ConfigResult<StubsConfig> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            format: "toml",
            message: e.to_string(),
        })
    }

    #[cfg(not(feature = "toml"))]
    fn parse_toml(_content: &str) -> ConfigResult<StubsConfig> {
        Err(ConfigError::UnsupportedFormat("toml".to_string()))
    }

    #[cfg(feature = "yaml")]
    fn parse_yaml(content: &str) -> ConfigResult<StubsConfig> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
            format: "yaml",
            message: e.to_string(),
        })
    }

    #[cfg(not(feature = "yaml"))]
    fn parse_yaml(_content: &str) -> ConfigResult<StubsConfig> {
        Err(ConfigError::UnsupportedFormat("yaml".to_string()))
    }
}
