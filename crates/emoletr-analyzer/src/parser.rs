//! Interpret raw LLM replies as analysis results

use crate::types::{AnalysisResult, EmotionEntry, ReplyField};
use serde_json::Value;
use tracing::warn;

/// Placeholder emotion used when the reply cannot be decoded
pub const PENDING_EMOTION: &str = "Analyse en cours";

/// Placeholder dominant emotion of a degraded result
pub const PENDING_DOMINANT: &str = "En cours d'analyse";

/// Tone reported by a degraded result
pub const MIXED_TONE: &str = "mixte";

/// Summary reported by a degraded result
pub const COMPLETED_SUMMARY: &str = "Analyse complétée";

/// Turn a raw reply into an [`AnalysisResult`]; never fails
///
/// Any JSON object is returned as decoded, including missing fields and
/// fields of unexpected type. Anything else yields [`degraded_result`]
/// carrying the raw reply.
pub fn interpret(raw: &str) -> AnalysisResult {
    let decoded = serde_json::from_str::<Value>(strip_code_fence(raw))
        .map_err(|e| e.to_string())
        .and_then(|value| match value {
            Value::Object(_) => serde_json::from_value(value).map_err(|e| e.to_string()),
            other => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        });

    match decoded {
        Ok(result) => result,
        Err(reason) => {
            warn!("LLM reply is not a valid analysis ({}), using degraded result", reason);
            degraded_result(raw)
        }
    }
}

/// Fallback result holding the unparsed reply in `cultural_notes`
pub fn degraded_result(raw: &str) -> AnalysisResult {
    AnalysisResult {
        emotions: Some(ReplyField::Expected(vec![EmotionEntry {
            kind: Some(PENDING_EMOTION.to_string().into()),
            intensity: Some(ReplyField::Expected(50)),
            percentage: Some(ReplyField::Expected(100.0)),
            passages: Some(ReplyField::Expected(Vec::new())),
            context: Some(String::new().into()),
            extra: Default::default(),
        }])),
        dominant_emotion: Some(PENDING_DOMINANT.to_string().into()),
        emotional_tone: Some(MIXED_TONE.to_string().into()),
        cultural_notes: Some(raw.to_string().into()),
        summary: Some(COMPLETED_SUMMARY.to_string().into()),
        extra: Default::default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Unwrap a reply wrapped in a Markdown code block
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    // Drop the opening line (``` or ```json) and the closing fence
    let Some((_, body)) = trimmed.split_once('\n') else {
        return trimmed;
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}
