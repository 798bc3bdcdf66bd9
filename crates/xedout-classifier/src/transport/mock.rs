//! Scripted transport for tests
//!
//! Replays a configured reply, records every request, and counts calls, so
//! callers can assert both on what was sent and on whether anything was sent.

use super::{HttpTransport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use xedout_core::{Error, Result};

type Responder = Arc<dyn Fn(&TransportRequest) -> Result<TransportResponse> + Send + Sync>;
type LatencyFn = Arc<dyn Fn(&TransportRequest) -> Duration + Send + Sync>;

/// A configurable mock transport
pub struct MockTransport {
    responder: Responder,
    latency: Option<LatencyFn>,
    requests: Mutex<Vec<TransportRequest>>,
    call_count: AtomicU32,
}

impl MockTransport {
    /// Create a mock that answers every call with the model reply `false`
    pub fn new() -> Self {
        Self::replying_with("false")
    }

    /// Answer every call with a 200 chat completion whose content is `content`
    pub fn replying_with(content: &str) -> Self {
        Self::with_response(200, completion_body(content))
    }

    /// Answer every call with a fixed status and body
    pub fn with_response(status: u16, body: impl Into<String>) -> Self {
        let response = TransportResponse::new(status, body);
        Self::with_responder(move |_| Ok(response.clone()))
    }

    /// Fail every call below HTTP with `message`
    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::with_responder(move |_| Err(Error::transport(message.clone())))
    }

    /// Compute each reply from the request
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&TransportRequest) -> Result<TransportResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Arc::new(responder),
            latency: None,
            requests: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Delay every reply by `latency`
    pub fn with_latency(self, latency: Duration) -> Self {
        self.with_latency_fn(move |_| latency)
    }

    /// Delay each reply by a duration computed from the request
    pub fn with_latency_fn<F>(mut self, latency: F) -> Self
    where
        F: Fn(&TransportRequest) -> Duration + Send + Sync + 'static,
    {
        self.latency = Some(Arc::new(latency));
        self
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Every request received, oldest first
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests().pop()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(&request)).await;
        }

        (self.responder)(&request)
    }
}

/// Body of a minimal chat completion whose first choice says `content`
pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
    .to_string()
}
