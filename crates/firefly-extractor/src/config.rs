//! Configuration for the Case Extractor

use serde::{Deserialize, Serialize};

/// Configuration for the Case Extractor
///
/// The defaults match production behavior; the knobs exist to bound work on
/// hostile input, not to tune extraction quality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Maximum input text length (characters); longer input is truncated
    /// before any pattern runs
    pub max_text_length: usize,

    /// Length of the description fallback prefix (characters) used when no
    /// cue matches
    pub description_fallback_chars: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        if self.description_fallback_chars == 0 {
            return Err("description_fallback_chars must be greater than 0".to_string());
        }
        if self.description_fallback_chars > self.max_text_length {
            return Err("description_fallback_chars cannot exceed max_text_length".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: 50_000,
            description_fallback_chars: 200,
        }
    }
}
