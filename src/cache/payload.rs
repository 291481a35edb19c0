//! Cached payloads
//!
//! Upstream results are opaque to the cache: either parsed JSON or raw bytes.

use bytes::Bytes;
use serde_json::Value;

/// Opaque value held by the response caches.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Bytes(Bytes),
}

/// Conversion between an operation's result type and [`Payload`].
///
/// `from_payload` returns None when the cached payload has another shape.
pub trait CachePayload: Sized {
    fn into_payload(self) -> Payload;
    fn from_payload(payload: Payload) -> Option<Self>;
}

impl CachePayload for Payload {
    fn into_payload(self) -> Payload {
        self
    }

    fn from_payload(payload: Payload) -> Option<Self> {
        Some(payload)
    }
}

impl CachePayload for Value {
    fn into_payload(self) -> Payload {
        Payload::Json(self)
    }

    fn from_payload(payload: Payload) -> Option<Self> {
        match payload {
            Payload::Json(value) => Some(value),
            Payload::Bytes(_) => None,
        }
    }
}

impl CachePayload for Bytes {
    fn into_payload(self) -> Payload {
        Payload::Bytes(self)
    }

    fn from_payload(payload: Payload) -> Option<Self> {
        match payload {
            Payload::Bytes(bytes) => Some(bytes),
            Payload::Json(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_payload_shape() {
        let payload = json!({"element_count": 3}).into_payload();
        assert!(matches!(payload, Payload::Json(_)));
        assert_eq!(Bytes::from_payload(payload.clone()), None);
        assert_eq!(Value::from_payload(payload), Some(json!({"element_count": 3})));
    }

    #[test]
    fn test_bytes_payload_shape() {
        let payload = Bytes::from_static(b"\x89PNG").into_payload();
        assert_eq!(Value::from_payload(payload.clone()), None);
        assert_eq!(Bytes::from_payload(payload), Some(Bytes::from_static(b"\x89PNG")));
    }
}
