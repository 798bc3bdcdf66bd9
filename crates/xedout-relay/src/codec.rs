//! Native messaging framing
//!
//! Each message is a 32-bit length in native byte order followed by that
//! many bytes of UTF-8 JSON:
//! ```text
//! +---------------+--------------------------------+
//! | len: u32 (ne) | {"action":"analyzeContent",..} |
//! +---------------+--------------------------------+
//! ```

use bytes::{Buf, BytesMut};
use serde_json::Value;
use tokio_util::codec::{Decoder, Encoder};
use xedout_core::{Error, Result};

/// Largest message a host may send back to the browser
pub const MAX_OUTBOUND_BYTES: usize = 1024 * 1024;

/// Default cap on messages accepted from the browser
pub const DEFAULT_MAX_INBOUND_BYTES: usize = 64 * 1024 * 1024;

const HEADER_LEN: usize = 4;

/// Length-prefixed JSON codec for stdin/stdout native messaging
#[derive(Debug, Clone)]
pub struct NativeMessageCodec {
    max_inbound_bytes: usize,
}

impl NativeMessageCodec {
    /// Create a codec with the default inbound cap
    pub fn new() -> Self {
        Self::with_max_inbound(DEFAULT_MAX_INBOUND_BYTES)
    }

    /// Create a codec that rejects inbound frames above `max_inbound_bytes`
    pub fn with_max_inbound(max_inbound_bytes: usize) -> Self {
        Self { max_inbound_bytes }
    }

    /// Whether `value` is small enough to send to the browser
    pub fn fits_outbound(value: &Value) -> bool {
        serde_json::to_vec(value)
            .map(|payload| payload.len() <= MAX_OUTBOUND_BYTES)
            .unwrap_or(false)
    }
}

impl Default for NativeMessageCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for NativeMessageCodec {
    type Item = Value;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Value>> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&src[..HEADER_LEN]);
        let len = u32::from_ne_bytes(header) as usize;

        if len > self.max_inbound_bytes {
            return Err(Error::protocol(format!(
                "inbound message of {} bytes exceeds limit of {} bytes",
                len, self.max_inbound_bytes
            )));
        }

        let frame_len = HEADER_LEN + len;
        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        src.advance(HEADER_LEN);
        let payload = src.split_to(len);

        serde_json::from_slice(&payload)
            .map(Some)
            .map_err(|e| Error::protocol(format!("inbound message is not valid JSON: {}", e)))
    }
}

impl Encoder<Value> for NativeMessageCodec {
    type Error = Error;

    fn encode(&mut self, item: Value, dst: &mut BytesMut) -> Result<()> {
        let payload = serde_json::to_vec(&item)?;

        if payload.len() > MAX_OUTBOUND_BYTES {
            return Err(Error::protocol(format!(
                "outbound message of {} bytes exceeds limit of {} bytes",
                payload.len(),
                MAX_OUTBOUND_BYTES
            )));
        }

        dst.reserve(HEADER_LEN + payload.len());
        dst.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
        dst.extend_from_slice(&payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(payload: &[u8]) -> BytesMut {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
        buf.extend_from_slice(payload);
        buf
    }

    #[test]
    fn test_decode_complete_frame() {
        let mut codec = NativeMessageCodec::new();
        let mut buf = frame(br#"{"action":"ping"}"#);

        let value = codec.decode(&mut buf).unwrap();
        assert_eq!(value, Some(json!({"action": "ping"})));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_waits_for_partial_frame() {
        let mut codec = NativeMessageCodec::new();
        let full = frame(br#"{"text":"hello"}"#);

        let mut buf = BytesMut::from(&full[..2]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(&full[2..10]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(&full[10..]);
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(json!({"text": "hello"}))
        );
    }

    #[test]
    fn test_decode_back_to_back_frames() {
        let mut codec = NativeMessageCodec::new();
        let mut buf = frame(b"1");
        buf.extend_from_slice(&frame(b"[2]"));

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(json!(1)));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(json!([2])));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_decode_rejects_oversized_frame() {
        let mut codec = NativeMessageCodec::with_max_inbound(8);
        let mut buf = frame(br#"{"too":"long"}"#);

        assert!(matches!(codec.decode(&mut buf), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_decode_rejects_invalid_json() {
        let mut codec = NativeMessageCodec::new();
        let mut buf = frame(b"{not json");

        assert!(matches!(codec.decode(&mut buf), Err(Error::Protocol(_))));
    }

    #[test]
    fn test_encode_writes_length_prefix() {
        let mut codec = NativeMessageCodec::new();
        let mut buf = BytesMut::new();

        codec
            .encode(json!({"success": true, "result": false}), &mut buf)
            .unwrap();

        let len = u32::from_ne_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        assert_eq!(len, buf.len() - 4);
        let decoded: Value = serde_json::from_slice(&buf[4..]).unwrap();
        assert_eq!(decoded, json!({"success": true, "result": false}));
    }

    #[test]
    fn test_encode_rejects_oversized_reply() {
        let mut codec = NativeMessageCodec::new();
        let mut buf = BytesMut::new();
        let huge = json!({"echo": "x".repeat(MAX_OUTBOUND_BYTES)});

        assert!(!NativeMessageCodec::fits_outbound(&huge));
        assert!(matches!(
            codec.encode(huge, &mut buf),
            Err(Error::Protocol(_))
        ));
        assert!(buf.is_empty());
    }
}
