//! Document and analysis result types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File extensions accepted for upload
pub const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "pdf"];

/// Declared kind of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// UTF-8 plain text (`.txt`)
    PlainText,
    /// Page-structured PDF (`.pdf`)
    Pdf,
}

impl DocumentKind {
    /// Determine the kind from a file name's extension (case-insensitive)
    ///
    /// Returns `None` when the name has no extension or one outside
    /// [`ALLOWED_EXTENSIONS`].
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(DocumentKind::PlainText),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// A field of the model's reply, kept whatever its JSON type
///
/// Values of the documented shape decode as `Expected`; anything else
/// (`"percentage": "60%"`, `"intensity": 72.5`) is kept verbatim as `Other`.
/// Both serialize back to the value the model sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyField<T> {
    /// Value of the documented type
    Expected(T),
    /// Any other JSON value
    Other(Value),
}

impl<T> ReplyField<T> {
    /// The value, when it has the documented type
    pub fn expected(&self) -> Option<&T> {
        match self {
            ReplyField::Expected(value) => Some(value),
            ReplyField::Other(_) => None,
        }
    }
}

impl ReplyField<String> {
    /// The value as text, when the model sent a string
    pub fn as_str(&self) -> Option<&str> {
        self.expected().map(String::as_str)
    }
}

impl<T> From<T> for ReplyField<T> {
    fn from(value: T) -> Self {
        ReplyField::Expected(value)
    }
}

/// One emotion detected in the text
///
/// Every field is optional: the model's reply is passed through as decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionEntry {
    /// Emotion name (joie, tristesse, nostalgie, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ReplyField<String>>,

    /// Intensity on a 0-100 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<ReplyField<u32>>,

    /// Share of the overall emotional content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<ReplyField<f64>>,

    /// Excerpts expressing the emotion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passages: Option<ReplyField<Vec<String>>>,

    /// Cultural or post-colonial context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<ReplyField<String>>,

    /// Any additional fields the model returned for this emotion
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured emotion analysis of a document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Detected emotions, in the order the model listed them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotions: Option<ReplyField<Vec<EmotionEntry>>>,

    /// Main emotion of the text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dominant_emotion: Option<ReplyField<String>>,

    /// Overall tone (positif / négatif / neutre / mixte)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<ReplyField<String>>,

    /// Notes on the Algerian post-colonial context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_notes: Option<ReplyField<String>>,

    /// Summary of the analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ReplyField<String>>,

    /// Any additional fields the model returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
