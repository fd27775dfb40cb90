//! OpenAI-compatible Provider Implementation
//!
//! Talks to any service exposing the `/chat/completions` contract: the
//! OpenAI API itself, or a self-hosted / alternate provider reached through
//! a custom base URL.
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Configurable endpoint and model
//! - Fixed sampling parameters (temperature 0.7, 2000 reply tokens)
//! - A single attempt per call: no retry, no backoff
//!
//! # Examples
//!
//! ```no_run
//! use emoletr_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new(Some("sk-...".to_string()), "gpt-4")
//!     .with_endpoint("http://localhost:8000/v1");
//! ```

use crate::{CompletionProvider, LlmError, PromptPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default OpenAI API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Sampling temperature sent with every request
pub const TEMPERATURE: f64 = 0.7;

/// Maximum number of tokens the model may generate
pub const MAX_REPLY_TOKENS: u32 = 2000;

/// Chat-completions provider for OpenAI-compatible APIs
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

/// A single message in the chat-completions request
#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Request body for the chat-completions API
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
    max_tokens: u32,
}

/// Response envelope from the chat-completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider against the default OpenAI endpoint
    ///
    /// # Parameters
    ///
    /// - `api_key`: Bearer credential; `None` leaves the provider unconfigured
    /// - `model`: Model to use (e.g., "gpt-4")
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    /// Redirect calls to a custom base URL (e.g., "http://localhost:8000/v1")
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }

    /// Send the conversation to the chat-completions API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No API key is configured
    /// - Network communication fails
    /// - The service answers with a non-success status
    /// - The response envelope has no message content
    pub async fn chat(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;
        let url = self.completions_url();

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &payload.system,
                },
                ChatMessage {
                    role: "user",
                    content: &payload.user,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_REPLY_TOKENS,
        };

        debug!("Sending chat completion to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let envelope = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        self.chat(payload).await
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
