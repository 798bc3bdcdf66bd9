//! HTTP transport for chat-completion calls
//!
//! The classifier only needs one capability from the network: POST a JSON
//! body with a bearer credential and get back the status and body text.
//! Keeping that behind [`HttpTransport`] lets prompt building and reply
//! parsing run unchanged against reqwest or a scripted mock.

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use xedout_core::{Error, Result};

/// One outgoing POST
#[derive(Clone)]
pub struct TransportRequest {
    /// Target URL
    pub url: String,

    /// Credential placed in `Authorization: Bearer ...`
    pub bearer_token: String,

    /// JSON body
    pub body: serde_json::Value,
}

impl std::fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportRequest")
            .field("url", &self.url)
            .field("bearer_token", &"<redacted>")
            .field("body", &self.body)
            .finish()
    }
}

/// Status and raw body of a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: u16,

    /// Body decoded as text
    pub body: String,
}

impl TransportResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Capability to POST JSON to the moderation endpoint
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return whatever status came back.
    ///
    /// Only failures below HTTP (connect, TLS, timeout) are errors here;
    /// non-2xx statuses are returned as responses.
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with reqwest's default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with an overall request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse> {
        debug!(url = %request.url, "Sending chat completion request");

        // `json` also sets Content-Type: application/json
        let response = self
            .client
            .post(&request.url)
            .bearer_auth(&request.bearer_token)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| Error::transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("failed to read response body: {}", e)))?;

        debug!(status, "Chat completion response received");

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_debug_hides_token() {
        let request = TransportRequest {
            url: "https://api.openai.com/v1/chat/completions".to_string(),
            bearer_token: "sk-live-123".to_string(),
            body: serde_json::json!({}),
        };

        let debug = format!("{:?}", request);
        assert!(!debug.contains("sk-live-123"));
    }

    #[test]
    fn test_with_timeout_builds() {
        assert!(ReqwestTransport::with_timeout(Duration::from_secs(30)).is_ok());
    }
}
