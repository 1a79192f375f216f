//! Production network boundary
//!
//! Moka-backed snapshot store plus a reqwest fetch path. The store carries a
//! versioned name; bumping the version suffix is the only supported
//! invalidation mechanism (old stores are orphaned, not purged).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::header;
use moka::future::Cache;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use super::boundary::{
    CacheDescriptor, CachedResponse, FetchError, FetchMode, FetchRequest, FetchedResponse,
    NetworkBoundary, ResponseKind,
};

/// Versioned name for the offline store.
pub const STORE_NAME: &str = "solver-offline-cache-v1";

/// Asset fetch timeout
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Moka store + reqwest fetcher behind the `NetworkBoundary` seam.
pub struct HttpBoundary {
    entries: Cache<CacheDescriptor, CachedResponse>,
    http_client: Client,
    page_origin: Url,
}

impl HttpBoundary {
    /// Open (creating if absent) the named store and build the fetch client.
    ///
    /// # Arguments
    /// * `page_origin` - Origin used to classify fetched responses as
    ///   same-origin or cross-origin
    pub fn new(page_origin: Url) -> Result<Self> {
        let entries = Cache::builder().name(STORE_NAME).build();

        let http_client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("Failed to create asset fetch client")?;

        info!(store = STORE_NAME, origin = %page_origin, "Offline store opened");

        Ok(Self {
            entries,
            http_client,
            page_origin,
        })
    }

    /// Classify a response by request origin and mode.
    fn classify(&self, url: &Url, mode: FetchMode) -> ResponseKind {
        if url.origin() == self.page_origin.origin() {
            ResponseKind::Basic
        } else {
            match mode {
                FetchMode::NoCors => ResponseKind::Opaque,
                FetchMode::Cors => ResponseKind::Cors,
            }
        }
    }
}

#[async_trait]
impl NetworkBoundary for HttpBoundary {
    async fn lookup(&self, descriptor: &CacheDescriptor) -> Option<CachedResponse> {
        self.entries.get(descriptor).await
    }

    async fn store(&self, descriptor: CacheDescriptor, response: CachedResponse) {
        debug!(
            url = descriptor.as_str(),
            size = response.body.len(),
            "Stored snapshot"
        );
        self.entries.insert(descriptor, response).await;
    }

    async fn fetch(&self, request: FetchRequest) -> Result<FetchedResponse, FetchError> {
        let kind = self.classify(&request.url, request.mode);

        let response = self
            .http_client
            .get(request.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        // An opaque response never exposes its real status to this layer.
        let status = match kind {
            ResponseKind::Opaque => 0,
            _ => status,
        };

        Ok(FetchedResponse::new(status, kind, content_type, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn boundary() -> HttpBoundary {
        HttpBoundary::new(Url::parse("https://app.example").unwrap()).unwrap()
    }

    fn snapshot(body: &'static [u8]) -> CachedResponse {
        CachedResponse {
            status: 200,
            kind: ResponseKind::Basic,
            content_type: Some("image/svg+xml".to_string()),
            body: Bytes::from_static(body),
        }
    }

    #[tokio::test]
    async fn test_store_and_lookup_roundtrip() {
        let boundary = boundary();
        let url = Url::parse("https://app.example/logo.svg").unwrap();
        let descriptor = CacheDescriptor::new(&url);

        assert!(boundary.lookup(&descriptor).await.is_none());

        boundary
            .store(descriptor.clone(), snapshot(b"<svg/>"))
            .await;

        let found = boundary.lookup(&descriptor).await.unwrap();
        assert_eq!(found.body, Bytes::from_static(b"<svg/>"));
    }

    #[tokio::test]
    async fn test_store_replaces_previous_entry() {
        let boundary = boundary();
        let url = Url::parse("https://app.example/index.html").unwrap();
        let descriptor = CacheDescriptor::new(&url);

        boundary.store(descriptor.clone(), snapshot(b"old")).await;
        boundary.store(descriptor.clone(), snapshot(b"new")).await;

        let found = boundary.lookup(&descriptor).await.unwrap();
        assert_eq!(found.body, Bytes::from_static(b"new"));
    }

    #[test]
    fn test_response_classification() {
        let boundary = boundary();

        let same = Url::parse("https://app.example/index.html").unwrap();
        assert_eq!(boundary.classify(&same, FetchMode::Cors), ResponseKind::Basic);
        assert_eq!(
            boundary.classify(&same, FetchMode::NoCors),
            ResponseKind::Basic
        );

        let cross = Url::parse("https://cdn.tailwindcss.com/").unwrap();
        assert_eq!(
            boundary.classify(&cross, FetchMode::NoCors),
            ResponseKind::Opaque
        );
        assert_eq!(
            boundary.classify(&cross, FetchMode::Cors),
            ResponseKind::Cors
        );
    }
}
