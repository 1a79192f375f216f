//! Solver backend client
//!
//! Thin reqwest wrapper that re-issues a buffered upload to the backend
//! origin. Only the original `Content-Type` header travels with the request;
//! every other inbound header is deliberately dropped.

use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, StatusCode};
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::errors::ProxyError;

/// HTTP client timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw backend answer, before translation.
#[derive(Debug)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Client for the hidden solver backend.
#[derive(Clone)]
pub struct BackendClient {
    http_client: Client,
}

impl BackendClient {
    pub fn new() -> Result<Self> {
        let http_client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client })
    }

    /// POST a fully buffered upload body to the backend.
    ///
    /// # Arguments
    /// * `backend_url` - Backend origin to forward to
    /// * `content_type` - Original `Content-Type` header (multipart boundary intact)
    /// * `body` - The buffered upload body
    ///
    /// # Returns
    /// The backend's status and raw body; transport failures become
    /// `ProxyError::Network`.
    pub async fn forward_upload(
        &self,
        backend_url: &Url,
        content_type: Option<&HeaderValue>,
        body: Bytes,
    ) -> Result<BackendReply, ProxyError> {
        debug!(backend = %backend_url, size = body.len(), "Forwarding upload to backend");

        let mut request = self.http_client.post(backend_url.clone()).body(body);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Network(e.to_string()))?;

        debug!(status = %status, size = body.len(), "Backend replied");

        Ok(BackendReply { status, body })
    }
}
