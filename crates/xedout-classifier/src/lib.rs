//! XedOut Classifier
//!
//! Turns a post into a moderation verdict by asking a chat-completion model.
//!
//! The work is split so that everything but the network hop is plain,
//! testable code:
//! - [`prompt`] builds the instruction text and the user message
//! - [`response`] reduces the API reply to a boolean
//! - [`transport`] abstracts the HTTP POST, with a reqwest implementation and
//!   a scripted mock (behind the `test-util` feature)
//! - [`client`] wires the three together behind [`ClassifierClient::classify`]

pub mod client;
pub mod config;
pub mod prompt;
pub mod response;
pub mod transport;

pub use client::ClassifierClient;
pub use config::ClassifierConfig;
#[cfg(any(test, feature = "test-util"))]
pub use transport::mock::MockTransport;
pub use transport::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::ClassifierClient;
    pub use crate::config::ClassifierConfig;
    pub use crate::transport::{HttpTransport, ReqwestTransport};
    pub use xedout_core::{ClassificationRequest, Error, Result};
}
