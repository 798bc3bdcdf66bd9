//! Native messaging host loop
//!
//! Reads framed requests until the browser closes the pipe, runs up to
//! `max_in_flight` of them at once, and writes each reply in the order its
//! request arrived. The browser has no request ids to match replies with, so
//! ordering is what ties a reply to its request.

use crate::codec::{NativeMessageCodec, MAX_OUTBOUND_BYTES};
use crate::relay::Relay;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};
use xedout_classifier::HttpTransport;
use xedout_core::{ClassificationResult, Result};

/// Limits applied by the host loop
#[derive(Debug, Clone, Copy)]
pub struct HostOptions {
    /// Requests processed concurrently
    pub max_in_flight: usize,

    /// Largest inbound frame accepted
    pub max_inbound_bytes: usize,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            max_inbound_bytes: crate::codec::DEFAULT_MAX_INBOUND_BYTES,
        }
    }
}

/// Serve messages from `reader` until EOF, writing replies to `writer`.
///
/// Returns the number of replies written. A framing error stops the loop
/// after the replies to all earlier requests have been written.
pub async fn run<R, W, T>(
    reader: R,
    writer: W,
    relay: &Relay<T>,
    options: HostOptions,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    T: HttpTransport,
{
    let frames = FramedRead::new(
        reader,
        NativeMessageCodec::with_max_inbound(options.max_inbound_bytes),
    );
    let mut sink = FramedWrite::new(writer, NativeMessageCodec::new());

    let replies = frames
        .map(move |frame| async move {
            let message = frame?;
            Ok::<_, xedout_core::Error>(relay.dispatch(message).await)
        })
        .buffered(options.max_in_flight.max(1));
    futures::pin_mut!(replies);

    info!(max_in_flight = options.max_in_flight, "Native host ready");

    let mut served = 0u64;
    while let Some(reply) = replies.next().await {
        let reply: Value = reply?;
        sink.send(bounded(reply)).await?;
        served += 1;
        debug!(served, "Reply written");
    }

    info!(served, "Input closed, native host exiting");
    Ok(served)
}

/// Replace replies the browser would refuse with a small failure result
fn bounded(reply: Value) -> Value {
    if NativeMessageCodec::fits_outbound(&reply) {
        return reply;
    }

    warn!(limit = MAX_OUTBOUND_BYTES, "Reply too large for native messaging, replacing");
    let failure = ClassificationResult::failure(format!(
        "response exceeds the {} byte native messaging limit",
        MAX_OUTBOUND_BYTES
    ));
    serde_json::to_value(failure).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_small_reply_passes_through() {
        let reply = json!({"success": true, "result": false});
        assert_eq!(bounded(reply.clone()), reply);
    }

    #[test]
    fn test_oversized_reply_is_replaced() {
        let reply = json!({"echo": "x".repeat(MAX_OUTBOUND_BYTES + 1)});
        let replaced = bounded(reply);

        assert_eq!(replaced["success"], json!(false));
        assert!(replaced["error"].as_str().unwrap().contains("native messaging limit"));
    }
}
