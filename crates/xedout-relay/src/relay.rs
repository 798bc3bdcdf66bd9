//! Message relay between the extension and the classifier client

use crate::message::{self, AnalyzeContent, InboundMessage};
use serde_json::Value;
use tracing::{debug, info, warn};
use xedout_classifier::{ClassifierClient, HttpTransport, ReqwestTransport};
use xedout_core::ClassificationResult;

/// Validates classification requests and forwards them to the classifier
pub struct Relay<T = ReqwestTransport> {
    classifier: ClassifierClient<T>,
}

impl<T: HttpTransport> Relay<T> {
    /// Create a relay over a classifier client
    pub fn new(classifier: ClassifierClient<T>) -> Self {
        Self { classifier }
    }

    /// The wrapped classifier client
    pub fn classifier(&self) -> &ClassifierClient<T> {
        &self.classifier
    }

    /// Handle one raw message and produce the raw reply
    pub async fn dispatch(&self, value: Value) -> Value {
        match InboundMessage::parse(value) {
            InboundMessage::AnalyzeContent(fields) => {
                let result = self.handle(fields).await;
                // A struct of bools and strings always serializes
                serde_json::to_value(&result).unwrap_or(Value::Null)
            }
            InboundMessage::Unknown(value) => {
                debug!("Echoing unrecognized message");
                message::echo(value)
            }
        }
    }

    /// Classify one post.
    ///
    /// Validation failures return before any network call is made. Every
    /// failure becomes `success: false` with the error's message.
    pub async fn handle(&self, fields: AnalyzeContent) -> ClassificationResult {
        let request = match fields.validate() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected analyzeContent request");
                return ClassificationResult::failure(e.to_string());
            }
        };

        info!(images = request.image_urls.len(), "Classifying post");

        let outcome = self.classifier.classify(&request).await;
        match &outcome {
            Ok(hide) => info!(hide, "Classification complete"),
            Err(e) => warn!(error = %e, kind = e.kind(), "Classification failed"),
        }

        ClassificationResult::from(outcome)
    }
}
