//! Firefly Bridge API
//!
//! HTTP surface for the disaster-relief case intake service: a post comes in
//! as raw text, the extractor derives the structured fields, and the case is
//! stored and served back to the operator UI.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ApiConfig;
use firefly_extractor::{CaseExtractor, Lexicon};
use firefly_store::SqliteStore;
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::info;

/// API server error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Lexicon file was unusable
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] firefly_extractor::LexiconError),

    /// Store could not be opened
    #[error("Store error: {0}")]
    Store(#[from] firefly_store::StoreError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the extractor from config: builtin lexicon, or a TOML replacement
fn build_extractor(config: &ApiConfig) -> Result<CaseExtractor, ApiError> {
    let lexicon = match &config.lexicon_path {
        Some(path) => {
            let contents = std::fs::read_to_string(path).map_err(config::ConfigError::FileRead)?;
            Lexicon::from_toml(&contents)?
        }
        None => Lexicon::builtin(),
    };

    Ok(CaseExtractor::with_lexicon(config.extractor.clone(), lexicon))
}

/// Start the API HTTP server
///
/// Initializes tracing, opens the store, builds the extractor and serves
/// the case intake routes until the process exits.
pub async fn start_server(config: ApiConfig) -> Result<(), ApiError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Firefly Bridge API");
    info!("Bind address: {}", config.bind_addr());
    info!("Database path: {}", config.database_path);

    let extractor = Arc::new(build_extractor(&config)?);
    let store = SqliteStore::new(&config.database_path)?;

    let state = AppState {
        store: Arc::new(Mutex::new(store)),
        extractor,
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ApiError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_extractor_with_builtin_lexicon() {
        let config = ApiConfig::default_test_config();
        let extractor = build_extractor(&config).unwrap();

        // Builtin vocabulary is live
        let result = extractor.extract("ฉุกเฉิน น้ำท่วมที่หาดใหญ่");
        assert_eq!(result.location.as_deref(), Some("หาดใหญ่"));
    }

    #[test]
    fn test_build_extractor_missing_lexicon_file() {
        let config = ApiConfig {
            lexicon_path: Some("/nonexistent/lexicon.toml".to_string()),
            ..ApiConfig::default_test_config()
        };

        assert!(matches!(
            build_extractor(&config),
            Err(ApiError::Config(_))
        ));
    }
}
