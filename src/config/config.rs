use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::config::LoggingConfig;
use crate::fhir::FieldMapping;
use crate::storage::StorageConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingValues(Vec<&'static str>),

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error("unknown storage backend: {0}")]
    UnknownBackend(String),

    #[error("storage option '{0}' is required for this backend")]
    MissingStorageOption(&'static str),

    #[error("failed to open log file '{path}': {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },
}

/// Settings loaded from the optional TOML file. Every section falls back to
/// its defaults, so running without a file targets S3 with the stock mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub mapping: FieldMapping,
}

impl Config {
    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.storage.validate()
    }
}
