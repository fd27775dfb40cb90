//! Error types for the analyzer

use emoletr_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while turning a stored document into text
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The file could not be read
    #[error("Error reading text file: {0}")]
    Io(#[from] std::io::Error),

    /// The plain-text file is not valid UTF-8
    #[error("Error reading text file: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The PDF could not be parsed, or one of its pages could not be read
    #[error("Error extracting PDF text: {0}")]
    Pdf(String),

    /// Extraction succeeded but produced only whitespace
    #[error("No text provided for analysis")]
    NoText,
}

/// Errors that can occur during an analysis run
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Nothing to analyze
    #[error("No text provided for analysis")]
    EmptyText,

    /// The completion provider failed
    #[error("Error analyzing emotions: {0}")]
    Llm(#[from] LlmError),
}

impl AnalyzerError {
    /// Whether the failure is due to a missing provider credential
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, AnalyzerError::Llm(LlmError::MissingCredential))
    }
}
