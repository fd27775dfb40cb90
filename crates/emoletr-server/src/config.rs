//! Configuration for the analysis server.
//!
//! Settings come from an optional TOML file, then command-line flags and
//! environment variables override individual fields. The result is built
//! once at startup and handed to the server; handlers never read the
//! environment themselves.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum accepted upload size in megabytes
pub const MAX_FILE_SIZE_MB: usize = 100;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4";

/// Server configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field has an unusable value
    #[error("Invalid configuration field: {0}")]
    InvalidField(String),
}

/// Server configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Bind port (e.g., 5000)
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,

    /// Directory holding uploads while their text is extracted
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Completion provider configuration
#[derive(Clone, Deserialize)]
pub struct LlmConfig {
    /// API credential (OPENAI_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier (LLM_MODEL)
    #[serde(default = "default_model")]
    pub model: String,

    /// Custom base URL for OpenAI-compatible endpoints (LLM_API_BASE)
    #[serde(default)]
    pub api_base: Option<String>,
}

// Keeps the credential out of logs
impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    5000
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            api_base: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            upload_dir: default_upload_dir(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ServerConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialization alone cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidField("llm.model".to_string()));
        }
        if self.upload_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidField("upload_dir".to_string()));
        }
        Ok(())
    }

    /// Whether a non-blank API credential is present
    pub fn api_configured(&self) -> bool {
        self.llm
            .api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    /// Get the full bind address (address:port)
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }

    /// Upload size limit in bytes
    pub fn max_upload_bytes(&self) -> usize {
        MAX_FILE_SIZE_MB * 1024 * 1024
    }
}
