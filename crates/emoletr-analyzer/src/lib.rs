//! EmoLetr Analyzer
//!
//! Emotion analysis of francophone and maghrebi literary texts using an LLM.
//!
//! # Overview
//!
//! A document is reduced to plain text, embedded in a fixed analysis prompt,
//! sent to a chat-completion provider, and the reply is interpreted as a
//! structured [`AnalysisResult`].
//!
//! # Architecture
//!
//! ```text
//! File → document::extract → PromptBuilder → CompletionProvider → parser::interpret → AnalysisResult
//! ```
//!
//! # Key Features
//!
//! - **Extraction**: UTF-8 plain text and page-by-page PDF text
//! - **Bounded prompts**: only the first 4000 characters are sent
//! - **Tolerant interpretation**: replies that are not the expected JSON
//!   become a degraded result instead of an error
//!
//! # Example Usage
//!
//! ```no_run
//! use emoletr_analyzer::Analyzer;
//! use emoletr_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let analyzer = Analyzer::new(Arc::new(MockProvider::new(r#"{"dominant_emotion": "joie"}"#)));
//!
//! let result = analyzer.analyze("Je suis heureux.").await?;
//!
//! println!("Dominant: {:?}", result.dominant_emotion);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod types;
pub mod document;
pub mod prompt;
pub mod parser;
mod analyzer;


pub use error::{AnalyzerError, ExtractionError};
pub use types::{AnalysisResult, DocumentKind, EmotionEntry, ReplyField, ALLOWED_EXTENSIONS};
pub use analyzer::Analyzer;
