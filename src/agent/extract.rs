//! JSON Extraction
//!
//! Best-effort extraction of a JSON object from free-form model
//! output. Prefers a fenced block explicitly marked `json`, then any
//! fenced block, then the whole text. Anything unparseable degrades
//! to data instead of raising.

use serde::de::DeserializeOwned;

use crate::types::StageResult;

/// Slice out the JSON payload from a model response.
pub fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + "```json".len()..];
        match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        }
    } else if let Some(start) = trimmed.find("```") {
        let rest = &trimmed[start + "```".len()..];
        match rest.find("```") {
            Some(end) => &rest[..end],
            None => rest,
        }
    } else {
        trimmed
    }
}

/// Parse a model response into a stage report.
///
/// Failures come back as `Degraded` carrying the unmodified response
/// text, so the pipeline never has to handle a distinct failure type.
pub fn parse_stage<R: DeserializeOwned>(raw: &str) -> StageResult<R> {
    let payload = extract_json_block(raw).trim();

    let value: serde_json::Value = match serde_json::from_str(payload) {
        Ok(v) => v,
        Err(e) => {
            return StageResult::Degraded {
                error: format!("Failed to parse response: {e}"),
                raw: raw.to_string(),
            }
        }
    };

    match serde_json::from_value::<R>(value) {
        Ok(report) => StageResult::Report(report),
        Err(e) => StageResult::Degraded {
            error: format!("Unexpected response shape: {e}"),
            raw: raw.to_string(),
        },
    }
}
