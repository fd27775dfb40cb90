//! EmoLetr Server CLI
//!
//! Starts the HTTP server for emotion analysis of literary texts.

use anyhow::Context;
use clap::Parser;
use emoletr_server::{config::ServerConfig, start_server};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// EmoLetr - Emotion analysis of francophone and maghrebi literature.
#[derive(Debug, Parser)]
#[command(name = "emoletr-server")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Load configuration from a TOML file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// IP address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory for temporary uploads
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// API key for the completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "LLM_MODEL")]
    model: Option<String>,

    /// Custom base URL for an OpenAI-compatible endpoint
    #[arg(long, env = "LLM_API_BASE")]
    api_base: Option<String>,
}

impl Cli {
    /// Build the server configuration: file first, then flags and environment
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind {
            config.bind_address = bind;
        }
        if let Some(port) = self.port {
            config.bind_port = port;
        }
        if let Some(upload_dir) = self.upload_dir {
            config.upload_dir = upload_dir;
        }
        if let Some(api_key) = self.api_key {
            config.llm.api_key = Some(api_key);
        }
        if let Some(model) = self.model {
            config.llm.model = model;
        }
        if let Some(api_base) = self.api_base {
            config.llm.api_base = Some(api_base);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Cli::parse().into_config()?;
    start_server(config).await?;
    Ok(())
}
