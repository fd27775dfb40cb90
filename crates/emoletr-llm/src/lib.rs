//! EmoLetr LLM Provider Layer
//!
//! Chat-completion providers used by the emotion analyzer.
//!
//! # Architecture
//!
//! Every backend implements the [`CompletionProvider`] trait, which takes a
//! two-message conversation ([`PromptPayload`]) and returns the raw reply text.
//! Interpreting that text is the caller's concern.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API
//!
//! # Examples
//!
//! ```
//! use emoletr_llm::{CompletionProvider, MockProvider, PromptPayload};
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let payload = PromptPayload::new("system", "user");
//! let reply = provider.complete(&payload).await.unwrap();
//! assert_eq!(reply, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API credential was configured for the provider
    #[error("LLM API key not configured")]
    MissingCredential,

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response envelope could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A two-message conversation sent to a completion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPayload {
    /// System instruction (role definition)
    pub system: String,

    /// User instruction carrying the task and the document text
    pub user: String,
}

impl PromptPayload {
    /// Create a payload from a system and a user instruction
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// A remote (or mocked) chat-completion backend
///
/// One call is one attempt: implementations do not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the conversation and return the raw reply text
    async fn complete(&self, payload: &PromptPayload) -> Result<String, LlmError>;

    /// Model identifier used for completions
    fn model(&self) -> &str;

    /// Whether the provider has the credential it needs to make calls
    fn is_configured(&self) -> bool;
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses can be keyed on the user instruction of the payload.
///
/// # Examples
///
/// ```
/// use emoletr_llm::{CompletionProvider, MockProvider, PromptPayload};
///
/// # async fn example() {
/// let mut provider = MockProvider::default();
/// provider.add_response("prompt1", "response1");
///
/// let payload = PromptPayload::new("system", "prompt1");
/// assert_eq!(provider.complete(&payload).await.unwrap(), "response1");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    model: String,
    configured: bool,
    default_response: String,
    responses: Arc<Mutex<HashMap<String, MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_payload: Arc<Mutex<Option<PromptPayload>>>,
}

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            model: "mock-model".to_string(),
            configured: true,
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_payload: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a provider that reports no credential and refuses every call
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    /// Override the reported model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Add a specific response for a given user instruction
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), MockReply::Text(response.into()));
    }

    /// Configure to return an error for a specific user instruction
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), MockReply::Error);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap() = 0;
    }

    /// The payload received by the most recent call
    pub fn last_payload(&self) -> Option<PromptPayload> {
        self.last_payload.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, LlmError> {
        if !self.configured {
            return Err(LlmError::MissingCredential);
        }

        *self.call_count.lock().unwrap() += 1;
        *self.last_payload.lock().unwrap() = Some(payload.clone());

        let responses = self.responses.lock().unwrap();
        match responses.get(&payload.user) {
            Some(MockReply::Text(response)) => Ok(response.clone()),
            Some(MockReply::Error) => Err(LlmError::Other("Mock error".to_string())),
            None => Ok(self.default_response.clone()),
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
