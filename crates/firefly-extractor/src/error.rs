//! Error types for lexicon loading
//!
//! Extraction itself is infallible; only building a lexicon from
//! user-supplied data can fail, and it fails at load time.

use thiserror::Error;

/// Errors that can occur while building a lexicon
#[derive(Error, Debug)]
pub enum LexiconError {
    /// A description cue pattern is not a valid regex
    #[error("Invalid pattern for cue '{name}': {source}")]
    InvalidPattern {
        /// Name of the offending cue
        name: String,
        /// Underlying regex compile error
        #[source]
        source: regex::Error,
    },

    /// An urgency tier names a level that does not exist
    #[error("Unknown urgency level: {0}")]
    UnknownLevel(String),

    /// An urgency tier was given with no keywords
    #[error("Empty {0} list")]
    EmptyList(&'static str),

    /// TOML parsing error
    #[error("Failed to parse lexicon TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}
