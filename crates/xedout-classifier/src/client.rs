//! Classifier client: one chat-completion call per post

use crate::config::ClassifierConfig;
use crate::prompt;
use crate::response;
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use xedout_core::{ChatCompletionRequest, ClassificationRequest, Result};

/// Asks a chat-completion model whether a post should be hidden
pub struct ClassifierClient<T = ReqwestTransport> {
    transport: T,
    config: ClassifierConfig,
}

impl ClassifierClient<ReqwestTransport> {
    /// Create a client backed by reqwest, honoring the configured timeout
    pub fn from_config(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        let transport = match config.request_timeout_secs {
            Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))?,
            None => ReqwestTransport::new(),
        };
        Ok(Self { transport, config })
    }
}

impl<T: HttpTransport> ClassifierClient<T> {
    /// Create a client over any transport
    pub fn new(transport: T, config: ClassifierConfig) -> Self {
        Self { transport, config }
    }

    /// Active configuration
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the chat-completion body for a post
    pub fn build_body(&self, request: &ClassificationRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![prompt::build_message(request, self.config.max_images)],
            temperature: self.config.temperature,
        }
    }

    /// Classify a post: `true` means hide it.
    ///
    /// Makes exactly one request. Non-2xx statuses, non-JSON bodies and
    /// API-reported errors surface as `Error::Api`; an unexpected reply shape
    /// as `Error::MalformedResponse`.
    pub async fn classify(&self, request: &ClassificationRequest) -> Result<bool> {
        let start = Instant::now();
        let body = serde_json::to_value(self.build_body(request))?;

        debug!(
            model = %self.config.model,
            images_sent = request.image_urls.len().min(self.config.max_images),
            "Calling moderation model"
        );

        let response = self
            .transport
            .post_json(TransportRequest {
                url: self.config.endpoint.clone(),
                bearer_token: request.api_key.clone(),
                body,
            })
            .await?;

        info!(
            status = response.status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Moderation API responded"
        );

        response::parse_verdict(response.status, &response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_body_shape_without_images() {
        let client = ClassifierClient::new(MockTransport::new(), ClassifierConfig::default());
        let request = ClassificationRequest::new("hello world", "sk-test", "Hide rage bait.");

        client.classify(&request).await.unwrap();

        let sent = client.transport().last_request().unwrap();
        assert_eq!(sent.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(sent.bearer_token, "sk-test");
        assert_eq!(sent.body["model"], json!("gpt-4o-mini"));
        assert_eq!(sent.body["temperature"], json!(0.7));
        assert_eq!(sent.body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(sent.body["messages"][0]["role"], json!("user"));
        assert!(sent.body["messages"][0]["content"].is_string());
    }

    #[tokio::test]
    async fn test_api_key_is_forwarded_verbatim() {
        let client = ClassifierClient::new(MockTransport::new(), ClassifierConfig::default());
        let request = ClassificationRequest::new("hi", "  odd key  ", "p");

        client.classify(&request).await.unwrap();

        assert_eq!(
            client.transport().last_request().unwrap().bearer_token,
            "  odd key  "
        );
    }

    #[tokio::test]
    async fn test_configured_overrides_are_sent() {
        let config = ClassifierConfig {
            endpoint: "http://localhost:8080/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            max_images: 1,
            request_timeout_secs: None,
        };
        let client = ClassifierClient::new(MockTransport::new(), config);
        let request = ClassificationRequest::new("t", "k", "p").with_images(["a", "b"]);

        client.classify(&request).await.unwrap();

        let sent = client.transport().last_request().unwrap();
        assert_eq!(sent.url, "http://localhost:8080/v1/chat/completions");
        assert_eq!(sent.body["model"], json!("gpt-4o"));
        assert_eq!(sent.body["messages"][0]["content"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = ClassifierConfig {
            temperature: -1.0,
            ..Default::default()
        };
        assert!(ClassifierClient::from_config(config).is_err());
    }
}
