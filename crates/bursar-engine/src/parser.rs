//! Recover a structured payload from raw model output

use crate::error::AnalystError;
use serde_json::{Map, Value};

/// Extract the first brace-delimited JSON object from a model response
///
/// Models wrap payloads in markdown fences and pad them with commentary;
/// this strips a fence when present, then takes the span from the first `{`
/// to the last `}` and parses it. Anything that does not yield a JSON
/// object is an error - the caller turns that into the pending-review
/// fallback.
pub(crate) fn extract_json_object(response: &str) -> Result<Map<String, Value>, AnalystError> {
    let unfenced = strip_code_fence(response.trim());

    let start = unfenced
        .find('{')
        .ok_or_else(|| AnalystError::MalformedResponse("no JSON object in response".to_string()))?;
    let end = unfenced
        .rfind('}')
        .ok_or_else(|| AnalystError::MalformedResponse("no JSON object in response".to_string()))?;
    if end < start {
        return Err(AnalystError::MalformedResponse(
            "no JSON object in response".to_string(),
        ));
    }

    let json: Value = serde_json::from_str(&unfenced[start..=end])
        .map_err(|e| AnalystError::MalformedResponse(format!("JSON parse error: {}", e)))?;

    match json {
        Value::Object(map) => Ok(map),
        _ => Err(AnalystError::MalformedResponse(
            "expected JSON object".to_string(),
        )),
    }
}

/// Drop a wrapping markdown code fence, keeping the inner lines
fn strip_code_fence(text: &str) -> String {
    if !text.starts_with("```") {
        return text.to_string();
    }

    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 2 {
        return text.to_string();
    }

    let last = if lines[lines.len() - 1].trim_start().starts_with("```") {
        lines.len() - 1
    } else {
        lines.len()
    };
    lines[1..last].join("\n")
}
