//! Configuration file parsing for the API server.
//!
//! Loads settings from TOML files including bind address, database path,
//! extractor limits and an optional replacement lexicon.

use firefly_extractor::ExtractorConfig;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// API configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// A field has an unusable value
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// API configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Bind address (e.g., "127.0.0.1")
    pub bind_address: String,

    /// Bind port (e.g., 8080)
    pub bind_port: u16,

    /// SQLite database path (":memory:" for an in-memory store)
    pub database_path: String,

    /// Optional path to a TOML lexicon replacing the builtin vocabulary
    #[serde(default)]
    pub lexicon_path: Option<String>,

    /// Extractor limits
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl ApiConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ApiConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate required fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_path.is_empty() {
            return Err(ConfigError::MissingField("database_path".to_string()));
        }
        self.extractor.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }

    /// Create a default configuration for testing
    pub fn default_test_config() -> Self {
        ApiConfig {
            bind_address: "127.0.0.1".to_string(),
            bind_port: 8080,
            database_path: ":memory:".to_string(),
            lexicon_path: None,
            extractor: ExtractorConfig::default(),
        }
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}
