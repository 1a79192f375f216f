//! Upload forwarder - the per-invocation proxy pipeline
//!
//! Method check, configuration check, body buffering, backend call, response
//! translation. Exactly one relay comes out of every invocation; there are no
//! retries and no partial responses.

use axum::http::Method;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use tracing::{debug, error};
use url::Url;

use super::backend::{BackendClient, BackendReply};
use super::errors::ProxyError;
use super::types::{InboundUpload, Relay, UploadBody};

/// Forwards image uploads to the configured solver backend.
///
/// The backend URL is handed in at construction; a missing URL is a
/// recoverable per-request configuration error, not a constructor failure.
pub struct UploadForwarder {
    backend_url: Option<Url>,
    client: BackendClient,
}

impl UploadForwarder {
    pub fn new(backend_url: Option<Url>, client: BackendClient) -> Self {
        Self {
            backend_url,
            client,
        }
    }

    /// Forward one inbound upload and produce the response to relay.
    ///
    /// Never fails: every error folds into its relay form, logged at a
    /// severity matching its place in the taxonomy.
    pub async fn forward(&self, upload: InboundUpload) -> Relay {
        match self.try_forward(upload).await {
            Ok(relay) => relay,
            Err(err) => {
                match &err {
                    ProxyError::MethodNotAllowed(method) => {
                        debug!(method = %method, "Rejected upload with unsupported method");
                    }
                    ProxyError::BackendUnconfigured => {
                        error!("Backend URL is not configured; rejecting upload");
                    }
                    ProxyError::Backend { status, message, .. } => {
                        error!(status = %status, message = %message, "Backend error");
                    }
                    other => {
                        error!(error = %other, "Proxy error");
                    }
                }
                err.into_relay()
            }
        }
    }

    async fn try_forward(&self, upload: InboundUpload) -> Result<Relay, ProxyError> {
        // Method check comes first: the body is never read for a rejection.
        if upload.method != Method::POST {
            return Err(ProxyError::MethodNotAllowed(upload.method));
        }

        let backend_url = self
            .backend_url
            .as_ref()
            .ok_or(ProxyError::BackendUnconfigured)?;

        let body = drain_body(upload.body).await?;

        let reply = self
            .client
            .forward_upload(backend_url, upload.content_type.as_ref(), body)
            .await?;

        translate(reply)
    }
}

/// Buffer the whole upload into one contiguous byte buffer.
///
/// The multipart boundary spans the entire body, so the backend transfer
/// cannot start until the last chunk has arrived. No size limit is enforced
/// at this layer.
async fn drain_body(mut body: UploadBody) -> Result<Bytes, ProxyError> {
    let mut buffer = BytesMut::new();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| ProxyError::BodyRead(e.to_string()))?;
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer.freeze())
}

/// Translate a raw backend reply into the caller-facing relay.
fn translate(reply: BackendReply) -> Result<Relay, ProxyError> {
    if reply.status.is_success() {
        // The caller always sees 200 on backend success, whatever 2xx the
        // backend actually used.
        let payload = serde_json::from_slice::<serde_json::Value>(&reply.body)
            .map_err(|e| ProxyError::MalformedResponse(e.to_string()))?;
        return Ok(Relay::passthrough(payload));
    }

    Err(ProxyError::backend_failure(reply.status, &reply.body))
}
