//! Turns raw model text into a [`CareerRecommendation`] or rejects it whole.

use careerpath_core::career::CareerRecommendation;
use careerpath_core::error::{Error, Result};
use serde_json::Value;

/// Remove Markdown code-fence markers the model may wrap around JSON.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Parse and check a quiz-analysis reply.
///
/// `careerPath` must be a non-empty string and `confidence` must be present
/// and non-null. Everything else passes through unchanged.
pub fn parse_recommendation(raw: &str) -> Result<CareerRecommendation> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| Error::MalformedResponse(format!("reply is not valid JSON: {e}")))?;

    let Value::Object(object) = &value else {
        return Err(Error::MalformedResponse("reply is not a JSON object".into()));
    };

    match object.get("careerPath") {
        Some(Value::String(path)) if !path.trim().is_empty() => {}
        _ => {
            return Err(Error::MalformedResponse(
                "careerPath is missing or empty".into(),
            ));
        }
    }

    if object.get("confidence").is_none_or(Value::is_null) {
        return Err(Error::MalformedResponse("confidence is missing".into()));
    }

    serde_json::from_value(value)
        .map_err(|e| Error::MalformedResponse(format!("unexpected recommendation shape: {e}")))
}
