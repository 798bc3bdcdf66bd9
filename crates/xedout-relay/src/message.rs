//! Messages exchanged with the extension
//!
//! Inbound values are plain JSON objects. Only `action: "analyzeContent"` is
//! a classification request; everything else is an [`InboundMessage::Unknown`]
//! that the relay echoes back.

use serde_json::{json, Map, Value};
use xedout_core::{ClassificationRequest, Error, Result};

/// Action name of a classification request
pub const ANALYZE_CONTENT: &str = "analyzeContent";

/// A message received from the extension
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Request to classify a post
    AnalyzeContent(AnalyzeContent),

    /// Any other message, kept as received
    Unknown(Value),
}

impl InboundMessage {
    /// Sort a raw message into its variant
    pub fn parse(value: Value) -> Self {
        let is_analyze = value.get("action").and_then(Value::as_str) == Some(ANALYZE_CONTENT);

        match value {
            Value::Object(fields) if is_analyze => {
                Self::AnalyzeContent(AnalyzeContent::from_fields(&fields))
            }
            other => Self::Unknown(other),
        }
    }
}

/// Fields of an `analyzeContent` message before validation.
///
/// A field that is absent or of the wrong JSON type is `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalyzeContent {
    pub text: Option<String>,
    pub image_urls: Vec<String>,
    pub api_key: Option<String>,
    pub prompt: Option<String>,
}

impl AnalyzeContent {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let string = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            text: string("text"),
            image_urls: image_urls(fields.get("imageUrls")),
            api_key: string("apiKey"),
            prompt: string("prompt"),
        }
    }

    /// Check required fields and build the classification request.
    ///
    /// `text`, `apiKey` and `prompt` must be present and non-empty.
    pub fn validate(self) -> Result<ClassificationRequest> {
        let required = |field: Option<String>| field.filter(|v| !v.is_empty());

        match (
            required(self.text),
            required(self.api_key),
            required(self.prompt),
        ) {
            (Some(text), Some(api_key), Some(prompt)) => Ok(ClassificationRequest {
                text,
                image_urls: self.image_urls,
                api_key,
                prompt,
            }),
            _ => Err(Error::missing_parameters()),
        }
    }
}

/// `imageUrls` counts only when it is an array made entirely of strings
fn image_urls(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}

/// Reply to a message the relay does not handle
pub fn echo(message: Value) -> Value {
    json!({ "echo": message })
}
