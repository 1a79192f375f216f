//! Proxy request and response types
//!
//! The forwarder is decoupled from the HTTP server: it consumes an
//! `InboundUpload` (method, content type, body chunk stream) and produces a
//! `Relay` descriptor by value. Converting the relay to a wire response is
//! the server layer's job.

use axum::http::{HeaderValue, Method, StatusCode};
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::Serialize;

/// Error type carried by upload body streams.
pub type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// Byte-chunk stream for an upload body. Total length is unknown in advance;
/// the forwarder drains it fully before contacting the backend.
pub type UploadBody = BoxStream<'static, Result<Bytes, BodyError>>;

/// One inbound upload request, as handed to the forwarder.
pub struct InboundUpload {
    /// Request method; anything but POST is rejected before the body is read.
    pub method: Method,
    /// Original `Content-Type` header, carrying the multipart boundary.
    pub content_type: Option<HeaderValue>,
    /// Body chunk stream.
    pub body: UploadBody,
}

impl InboundUpload {
    pub fn new(method: Method, content_type: Option<HeaderValue>, body: UploadBody) -> Self {
        Self {
            method,
            content_type,
            body,
        }
    }
}

/// The single response a forwarder invocation produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Relay {
    /// Status relayed to the caller.
    pub status: StatusCode,
    /// `Allow` header value, set only on method rejections.
    pub allow: Option<&'static str>,
    /// JSON body.
    pub body: RelayBody,
}

impl Relay {
    /// Successful relay: the backend's JSON payload, always with status 200.
    pub fn passthrough(payload: serde_json::Value) -> Self {
        Self {
            status: StatusCode::OK,
            allow: None,
            body: RelayBody::Passthrough(payload),
        }
    }
}

/// JSON body shapes the gateway sends back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RelayBody {
    /// Backend payload relayed verbatim.
    Passthrough(serde_json::Value),
    /// Plain message body (method rejection, configuration error).
    Message { message: String },
    /// Backend failure with whatever detail the backend provided.
    BackendFailure {
        message: String,
        details: serde_json::Value,
    },
    /// Proxy-level failure with a diagnostic string.
    ProxyFailure { message: String, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_message_body() {
        let body = RelayBody::Message {
            message: "Method PUT Not Allowed".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"Method PUT Not Allowed"}"#);
    }

    #[test]
    fn test_serialize_backend_failure_body() {
        let body = RelayBody::BackendFailure {
            message: "bad image".to_string(),
            details: json!({"message": "bad image"}),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""message":"bad image""#));
        assert!(json.contains(r#""details""#));
    }

    #[test]
    fn test_serialize_proxy_failure_body() {
        let body = RelayBody::ProxyFailure {
            message: "An error occurred while processing your request.".to_string(),
            error: "connection refused".to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(&serde_json::to_string(&body).unwrap()).unwrap();
        assert_eq!(
            value["message"],
            "An error occurred while processing your request."
        );
        assert_eq!(value["error"], "connection refused");
    }

    #[test]
    fn test_passthrough_preserves_payload() {
        let payload = json!({"ok": true, "grid": [1, 2, 3]});
        let relay = Relay::passthrough(payload.clone());
        assert_eq!(relay.status, StatusCode::OK);
        let json = serde_json::to_value(&relay.body).unwrap();
        assert_eq!(json, payload);
    }
}
