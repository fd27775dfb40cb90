//! Core Analyzer implementation

use crate::error::AnalyzerError;
use crate::parser::interpret;
use crate::prompt::PromptBuilder;
use crate::types::{AnalysisResult, ReplyField};
use emoletr_llm::CompletionProvider;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// The Analyzer turns document text into a structured emotion analysis
///
/// It holds no per-request state and can be shared across requests.
pub struct Analyzer {
    provider: Arc<dyn CompletionProvider>,
}

impl Analyzer {
    /// Create a new Analyzer on top of a completion provider
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Model identifier of the underlying provider
    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Whether the underlying provider has a credential
    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Analyze the emotions expressed in `text`
    ///
    /// Only the provider call can fail; an unparseable reply produces a
    /// degraded result instead of an error.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzerError> {
        if text.trim().is_empty() {
            return Err(AnalyzerError::EmptyText);
        }

        let start_time = Instant::now();

        let builder = PromptBuilder::new(text);
        let payload = builder.build();

        info!(
            "Starting emotion analysis with model '{}', text length {} ({} embedded)",
            self.model(),
            text.chars().count(),
            builder.embedded_text().chars().count()
        );
        debug!("Prompt length: {} chars", payload.user.len());

        let reply = self.provider.complete(&payload).await?;

        debug!("LLM response length: {} chars", reply.len());

        let result = interpret(&reply);

        info!(
            "Analysis complete in {} ms: {} emotions",
            start_time.elapsed().as_millis(),
            result
                .emotions
                .as_ref()
                .and_then(ReplyField::expected)
                .map_or(0, Vec::len)
        );

        Ok(result)
    }
}
