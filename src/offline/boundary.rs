//! Network boundary types
//!
//! The cache engine never talks to a store or a socket directly; it goes
//! through the `NetworkBoundary` trait. Production wires this to a moka
//! store and a reqwest client, tests wire it to counting mocks.

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

/// Key identifying a cached entry.
///
/// Derived from the absolute request URL; only GET-like fetches are
/// intercepted, so the URL alone identifies the entry. At most one stored
/// entry exists per descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheDescriptor(String);

impl CacheDescriptor {
    pub fn new(url: &Url) -> Self {
        Self(url.as_str().to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// How far a fetched response can be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin; status and body are readable.
    Basic,
    /// Cross-origin fetched without CORS inspection; status and body are
    /// unreadable, the response can only be replayed.
    Opaque,
    /// Cross-origin but CORS-readable.
    Cors,
}

/// Fetch mode requested by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Normal fetch; cross-origin responses stay inspectable.
    Cors,
    /// Bypass cross-origin inspection; the response comes back opaque.
    NoCors,
}

/// An outbound network request the engine wants performed.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: Url,
    pub mode: FetchMode,
}

/// Errors from the network side of the boundary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid fetch URL: {0}")]
    InvalidUrl(String),

    #[error("Response body already consumed")]
    BodyConsumed,
}

/// Stored snapshot of a response. Cloneable and replayable any number of
/// times, unlike the live response it was duplicated from.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    /// Status as stored; 0 for opaque responses, whose real status was
    /// never readable.
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// A live network response.
///
/// The body is a single-read stream: delivering it to the caller consumes
/// it, and a snapshot for the store must be split off while the body is
/// still unread.
#[derive(Debug)]
pub struct FetchedResponse {
    status: u16,
    kind: ResponseKind,
    content_type: Option<String>,
    body: Option<Bytes>,
}

impl FetchedResponse {
    pub fn new(status: u16, kind: ResponseKind, content_type: Option<String>, body: Bytes) -> Self {
        Self {
            status,
            kind,
            content_type,
            body: Some(body),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn kind(&self) -> ResponseKind {
        self.kind
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Split off a storable snapshot without consuming the deliverable body.
    pub fn duplicate(&self) -> Result<CachedResponse, FetchError> {
        let body = self.body.as_ref().ok_or(FetchError::BodyConsumed)?;
        Ok(CachedResponse {
            status: self.status,
            kind: self.kind,
            content_type: self.content_type.clone(),
            body: body.clone(),
        })
    }

    /// Consume the whole response into a snapshot (preload path, where
    /// nothing is delivered to a caller).
    pub fn into_snapshot(self) -> Result<CachedResponse, FetchError> {
        let body = self.body.ok_or(FetchError::BodyConsumed)?;
        Ok(CachedResponse {
            status: self.status,
            kind: self.kind,
            content_type: self.content_type,
            body,
        })
    }

    /// Read the body, consuming it. A second read fails.
    pub fn read_body(&mut self) -> Result<Bytes, FetchError> {
        self.body.take().ok_or(FetchError::BodyConsumed)
    }
}

/// Seam between the cache engine and the ambient cache/network runtime.
#[async_trait]
pub trait NetworkBoundary: Send + Sync {
    /// Look up a stored snapshot by descriptor.
    async fn lookup(&self, descriptor: &CacheDescriptor) -> Option<CachedResponse>;

    /// Store a snapshot under the descriptor, replacing any previous entry.
    async fn store(&self, descriptor: CacheDescriptor, response: CachedResponse);

    /// Perform a real network fetch.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchedResponse, FetchError>;
}
