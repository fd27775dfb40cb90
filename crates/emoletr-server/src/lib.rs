//! EmoLetr Server
//!
//! HTTP front end of the emotion analyzer: accepts pasted text or uploaded
//! `.txt` / `.pdf` documents and returns a structured emotion analysis.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod upload;

use config::ServerConfig;
use emoletr_analyzer::Analyzer;
use emoletr_llm::{CompletionProvider, OpenAiProvider};
use handlers::{create_router, AppState};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding or filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the OpenAI-compatible provider described by the configuration
pub fn build_provider(config: &ServerConfig) -> OpenAiProvider {
    let provider = OpenAiProvider::new(config.llm.api_key.clone(), config.llm.model.clone());
    match &config.llm.api_base {
        Some(base) if !base.trim().is_empty() => provider.with_endpoint(base.trim()),
        _ => provider,
    }
}

/// Build application state around an arbitrary completion provider
pub fn build_state(config: ServerConfig, provider: Arc<dyn CompletionProvider>) -> AppState {
    AppState {
        config: Arc::new(config),
        analyzer: Arc::new(Analyzer::new(provider)),
    }
}

/// Start the analysis HTTP server
///
/// Creates the upload directory, builds the provider from the configuration,
/// and serves until the listener fails.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    config.validate()?;

    info!("Starting EmoLetr server");
    info!("Bind address: {}", config.bind_addr());
    info!("Upload directory: {:?}", config.upload_dir);

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let provider = build_provider(&config);
    if config.api_configured() {
        info!("LLM API configured (model: {}, endpoint: {})", provider.model(), provider.endpoint());
    } else {
        warn!("OPENAI_API_KEY not set: analysis requests will be refused until configured");
    }

    let bind_addr = config.bind_addr();
    let state = build_state(config, Arc::new(provider));
    let app = create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_provider_uses_config() {
        let mut config = ServerConfig::default();
        config.llm.api_key = Some("sk-test".to_string());
        config.llm.model = "gpt-4o".to_string();
        config.llm.api_base = Some("http://localhost:8000/v1".to_string());

        let provider = build_provider(&config);
        assert!(provider.is_configured());
        assert_eq!(provider.model(), "gpt-4o");
        assert_eq!(provider.endpoint(), "http://localhost:8000/v1");
    }

    #[test]
    fn test_provider_agrees_with_config_on_credential() {
        for key in [None, Some(""), Some("   "), Some("sk-test")] {
            let mut config = ServerConfig::default();
            config.llm.api_key = key.map(str::to_string);
            assert_eq!(
                build_provider(&config).is_configured(),
                config.api_configured(),
                "{:?}",
                key
            );
        }
    }

    #[test]
    fn test_build_provider_without_key() {
        let provider = build_provider(&ServerConfig::default());
        assert!(!provider.is_configured());
        assert_eq!(provider.endpoint(), emoletr_llm::openai::DEFAULT_ENDPOINT);
    }
}
