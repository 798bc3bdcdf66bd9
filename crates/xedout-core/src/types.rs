//! Core types for XedOut

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single post to classify, as received from the extension.
///
/// Built per incoming message and dropped once the verdict is returned.
#[derive(Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    /// Post text
    pub text: String,

    /// Image URLs attached to the post, in page order
    pub image_urls: Vec<String>,

    /// Caller-supplied API credential, forwarded verbatim
    pub api_key: String,

    /// Moderation instruction written by the user
    pub prompt: String,
}

impl ClassificationRequest {
    /// Create a request without images
    pub fn new(
        text: impl Into<String>,
        api_key: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            image_urls: Vec::new(),
            api_key: api_key.into(),
            prompt: prompt.into(),
        }
    }

    /// Attach image URLs
    pub fn with_images<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the post carries any images
    pub fn has_images(&self) -> bool {
        !self.image_urls.is_empty()
    }
}

// The API key must never reach a log line.
impl fmt::Debug for ClassificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassificationRequest")
            .field("text_len", &self.text.len())
            .field("image_urls", &self.image_urls)
            .field("api_key", &"<redacted>")
            .field("prompt_len", &self.prompt.len())
            .finish()
    }
}

/// Outcome returned to the extension.
///
/// Serializes to the wire shape `{success, result?, error?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether classification completed
    pub success: bool,

    /// Verdict: `true` means the post should be hidden
    #[serde(rename = "result", default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<bool>,

    /// Human-readable failure reason
    #[serde(rename = "error", default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ClassificationResult {
    /// Successful classification
    pub fn verdict(hide: bool) -> Self {
        Self {
            success: true,
            verdict: Some(hide),
            error_message: None,
        }
    }

    /// Failed classification
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            verdict: None,
            error_message: Some(message.into()),
        }
    }
}

impl From<crate::Result<bool>> for ClassificationResult {
    fn from(outcome: crate::Result<bool>) -> Self {
        match outcome {
            Ok(hide) => Self::verdict(hide),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

/// A chat message in the completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: MessageContent,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(role: impl Into<String>, content: impl Into<MessageContent>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new("user", content)
    }
}

/// Message content: a bare string or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// One block of multi-part content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    /// Text block
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Image reference block
    pub fn image(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Body of a chat-completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    /// Model identifier
    pub model: String,

    /// Conversation; always a single user message here
    pub messages: Vec<ChatMessage>,

    /// Sampling temperature
    pub temperature: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_debug_redacts_api_key() {
        let request = ClassificationRequest::new("hello", "sk-secret", "hide spam");
        let debug = format!("{:?}", request);

        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_result_wire_shape() {
        let ok = serde_json::to_value(ClassificationResult::verdict(true)).unwrap();
        assert_eq!(ok, json!({"success": true, "result": true}));

        let failed =
            serde_json::to_value(ClassificationResult::failure("Missing required parameters"))
                .unwrap();
        assert_eq!(
            failed,
            json!({"success": false, "error": "Missing required parameters"})
        );
    }

    #[test]
    fn test_result_from_outcome() {
        let err: crate::Result<bool> = Err(crate::Error::malformed("no choices"));
        let result = ClassificationResult::from(err);

        assert!(!result.success);
        assert!(result.verdict.is_none());
        assert!(result
            .error_message
            .unwrap()
            .contains("Invalid API response structure"));
    }

    #[test]
    fn test_multipart_content_serialization() {
        let message = ChatMessage::user(vec![
            ContentPart::text("prompt"),
            ContentPart::image("https://example.com/a.jpg"),
        ]);

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "role": "user",
                "content": [
                    {"type": "text", "text": "prompt"},
                    {"type": "image_url", "image_url": {"url": "https://example.com/a.jpg"}}
                ]
            })
        );
    }

    #[test]
    fn test_plain_content_serializes_as_string() {
        let message = ChatMessage::user("just text");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"role": "user", "content": "just text"})
        );
    }
}
