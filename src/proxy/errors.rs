//! Proxy error types
//!
//! Structured error handling for the upload forwarding path. Every error
//! folds into exactly one `Relay` so a forwarder invocation always produces
//! a single response.

use axum::http::{Method, StatusCode};

use super::types::{Relay, RelayBody};

/// Errors raised while forwarding an upload to the solver backend.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Method {0} Not Allowed")]
    MethodNotAllowed(Method),

    #[error("Server configuration error: Backend URL is not defined.")]
    BackendUnconfigured,

    #[error("Backend error {status}: {message}")]
    Backend {
        status: StatusCode,
        message: String,
        details: serde_json::Value,
    },

    #[error("Failed to read upload body: {0}")]
    BodyRead(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl ProxyError {
    /// Build a backend failure from a non-success status and raw body.
    ///
    /// Extracts the backend's `message` field when the body parses as JSON;
    /// otherwise substitutes the status text (or a generic fallback) and a
    /// synthesized details object, so the caller always gets both fields.
    pub fn backend_failure(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(details) => {
                let message = details
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
                    .unwrap_or_else(|| {
                        format!("Backend responded with status: {}", status.as_u16())
                    });
                ProxyError::Backend {
                    status,
                    message,
                    details,
                }
            }
            Err(_) => {
                let message = status
                    .canonical_reason()
                    .unwrap_or("Failed to parse backend error response.")
                    .to_string();
                let details = serde_json::json!({ "message": message });
                ProxyError::Backend {
                    status,
                    message,
                    details,
                }
            }
        }
    }

    /// Fold this error into the response relayed to the caller.
    pub fn into_relay(self) -> Relay {
        match self {
            ProxyError::MethodNotAllowed(method) => Relay {
                status: StatusCode::METHOD_NOT_ALLOWED,
                allow: Some("POST"),
                body: RelayBody::Message {
                    message: format!("Method {} Not Allowed", method),
                },
            },
            ProxyError::BackendUnconfigured => Relay {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                allow: None,
                body: RelayBody::Message {
                    message: "Server configuration error: Backend URL is not defined."
                        .to_string(),
                },
            },
            ProxyError::Backend {
                status,
                message,
                details,
            } => Relay {
                status,
                allow: None,
                body: RelayBody::BackendFailure { message, details },
            },
            other => Relay {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                allow: None,
                body: RelayBody::ProxyFailure {
                    message: "An error occurred while processing your request.".to_string(),
                    error: other.to_string(),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_failure_extracts_message() {
        let err = ProxyError::backend_failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"message":"bad image"}"#,
        );
        match err {
            ProxyError::Backend {
                status,
                message,
                details,
            } => {
                assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
                assert_eq!(message, "bad image");
                assert_eq!(details, json!({"message": "bad image"}));
            }
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_backend_failure_without_message_field() {
        let err = ProxyError::backend_failure(StatusCode::BAD_GATEWAY, br#"{"detail":"upstream"}"#);
        match err {
            ProxyError::Backend { message, details, .. } => {
                assert_eq!(message, "Backend responded with status: 502");
                assert_eq!(details, json!({"detail": "upstream"}));
            }
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_backend_failure_non_json_uses_status_text() {
        let err =
            ProxyError::backend_failure(StatusCode::INTERNAL_SERVER_ERROR, b"<html>boom</html>");
        match err {
            ProxyError::Backend { message, details, .. } => {
                assert_eq!(message, "Internal Server Error");
                assert_eq!(details, json!({"message": "Internal Server Error"}));
            }
            other => panic!("Expected Backend error, got {:?}", other),
        }
    }

    #[test]
    fn test_method_rejection_sets_allow_header() {
        let relay = ProxyError::MethodNotAllowed(Method::GET).into_relay();
        assert_eq!(relay.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(relay.allow, Some("POST"));
        assert_eq!(
            relay.body,
            RelayBody::Message {
                message: "Method GET Not Allowed".to_string()
            }
        );
    }

    #[test]
    fn test_transport_errors_fold_to_generic_500() {
        let relay = ProxyError::Network("connection refused".to_string()).into_relay();
        assert_eq!(relay.status, StatusCode::INTERNAL_SERVER_ERROR);
        match relay.body {
            RelayBody::ProxyFailure { message, error } => {
                assert_eq!(message, "An error occurred while processing your request.");
                assert!(error.contains("connection refused"));
            }
            other => panic!("Expected ProxyFailure body, got {:?}", other),
        }
    }
}
