//! XedOut Relay
//!
//! Native messaging host for the XedOut extension. The browser launches the
//! `xedout-relay` binary and talks to it over stdin/stdout; each
//! `analyzeContent` message is validated, classified through
//! [`xedout_classifier::ClassifierClient`], and answered with
//! `{success, result?, error?}`.

pub mod codec;
pub mod config;
pub mod host;
pub mod message;
pub mod relay;

pub use codec::NativeMessageCodec;
pub use config::{ConfigOverrides, RelayConfig};
pub use host::HostOptions;
pub use message::{AnalyzeContent, InboundMessage};
pub use relay::Relay;
