//! XedOut Core
//!
//! Core types and error handling shared across the XedOut moderation bridge.
//!
//! This crate provides:
//! - The classification request and result exchanged with the extension
//! - Chat-completion wire types used to talk to the moderation model
//! - The error taxonomy and result alias used by every other crate

pub mod error;
pub mod types;

pub use error::{ApiError, Error, Result};
pub use types::{
    ChatCompletionRequest, ChatMessage, ClassificationRequest, ClassificationResult, ContentPart,
    ImageUrl, MessageContent,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{ApiError, Error, Result};
    pub use crate::types::{ChatMessage, ClassificationRequest, ClassificationResult};
}
