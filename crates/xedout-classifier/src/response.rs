//! Reduction of chat-completion replies to a verdict
//!
//! Handles the non-streaming chat completions format:
//! ```text
//! {"id":"chatcmpl-xxx","object":"chat.completion","model":"gpt-4o-mini","choices":[{"index":0,"message":{"role":"assistant","content":"true"},"finish_reason":"stop"}]}
//! ```

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use xedout_core::{ApiError, Error, Result};

/// Turn an HTTP status and body into a verdict
pub fn parse_verdict(status: u16, body: &str) -> Result<bool> {
    if !(200..=299).contains(&status) {
        return Err(ApiError::Status {
            status,
            body: body.to_string(),
        }
        .into());
    }

    let payload: Value = serde_json::from_str(body).map_err(|e| ApiError::InvalidJson {
        status,
        detail: e.to_string(),
    })?;

    let content = extract_content(payload)?;
    debug!(reply_len = content.len(), "Model reply received");

    Ok(normalize_verdict(&content))
}

/// Pull `choices[0].message.content` out of a reply, surfacing API errors first.
///
/// The `error` member is checked before the rest of the payload is looked at,
/// so an error reply is reported as such whatever shape its other fields have.
pub fn extract_content(payload: Value) -> Result<String> {
    if let Some(error) = payload.get("error").filter(|e| is_truthy(e)) {
        let message = match error.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        };
        return Err(ApiError::Reported { message }.into());
    }

    let completion: Completion = serde_json::from_value(payload)
        .map_err(|e| Error::malformed(format!("unexpected payload: {}", e)))?;

    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::malformed("missing choices"))?;

    let message = choice
        .message
        .ok_or_else(|| Error::malformed("missing choices[0].message"))?;

    match message.content {
        Some(Value::String(content)) => Ok(content),
        _ => Err(Error::malformed("choices[0].message.content is not a string")),
    }
}

/// `null`, `false`, `0` and `""` do not count as an error member
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Only a reply of `true` (any case, surrounding whitespace ignored) hides the post
pub fn normalize_verdict(content: &str) -> bool {
    content.to_lowercase().trim() == "true"
}

// =============================================================================
// Chat Completion Response Structures
// =============================================================================

#[derive(Debug, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<Value>,
}
