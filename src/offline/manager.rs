//! Offline cache manager
//!
//! Drives the two lifecycle events: activation (best-effort preload of the
//! fixed asset list) and interception (cache-first lookup with opportunistic
//! store on the way through).

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, trace, warn};
use url::Url;

use super::assets::PRELOAD_ASSETS;
use super::boundary::{
    CacheDescriptor, CachedResponse, FetchError, FetchMode, FetchRequest, FetchedResponse,
    NetworkBoundary, ResponseKind,
};

/// What an interception handed back to the caller.
#[derive(Debug)]
pub enum Delivery {
    /// Served from the store; no network access occurred.
    FromCache(CachedResponse),
    /// Served from the network (and possibly stored on the way through).
    FromNetwork(FetchedResponse),
}

/// Cache-first engine over an abstract network boundary.
pub struct OfflineCacheManager<B: NetworkBoundary> {
    boundary: B,
    /// Origin relative preload paths resolve against.
    origin: Url,
    /// Cache hit counter
    hits: AtomicU64,
    /// Cache miss counter
    misses: AtomicU64,
}

impl<B: NetworkBoundary> OfflineCacheManager<B> {
    pub fn new(boundary: B, origin: Url) -> Self {
        Self {
            boundary,
            origin,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Activation event: pre-populate the store with the fixed asset list.
    ///
    /// Each entry failure is logged and skipped; the remaining entries still
    /// load. Completes only after every attempt has settled.
    ///
    /// # Returns
    /// How many assets were stored.
    pub async fn activate(&self) -> usize {
        let mut stored = 0;

        for &asset in PRELOAD_ASSETS {
            match self.preload(asset).await {
                Ok(()) => stored += 1,
                Err(e) => {
                    warn!(asset = asset, error = %e, "Failed to preload asset");
                }
            }
        }

        info!(
            stored = stored,
            total = PRELOAD_ASSETS.len(),
            "Offline store activated"
        );
        stored
    }

    async fn preload(&self, asset: &str) -> Result<(), FetchError> {
        let url = self
            .origin
            .join(asset)
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let descriptor = CacheDescriptor::new(&url);

        // no-cors keeps cross-origin entries fetchable at the cost of
        // opaque, unverifiable snapshots.
        let response = self
            .boundary
            .fetch(FetchRequest {
                url,
                mode: FetchMode::NoCors,
            })
            .await?;

        let snapshot = response.into_snapshot()?;
        self.boundary.store(descriptor, snapshot).await;
        Ok(())
    }

    /// Interception event: answer one outbound request cache-first.
    ///
    /// Hit: the stored snapshot comes back and the network is never touched.
    /// Miss: the request goes to the network; same-origin 200 responses and
    /// opaque responses are duplicated into the store before the original is
    /// returned, anything else passes through uncached.
    pub async fn intercept(&self, request: FetchRequest) -> Result<Delivery, FetchError> {
        let descriptor = CacheDescriptor::new(&request.url);

        if let Some(cached) = self.boundary.lookup(&descriptor).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url = descriptor.as_str(), "Offline store HIT");
            return Ok(Delivery::FromCache(cached));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(url = descriptor.as_str(), "Offline store MISS");

        let response = self.boundary.fetch(request).await?;

        let cacheable = match response.kind() {
            ResponseKind::Basic => response.status() == 200,
            // Best effort: the status is unreadable, some cached value
            // beats none.
            ResponseKind::Opaque => true,
            ResponseKind::Cors => false,
        };

        if cacheable {
            // Duplicate before delivery; the body is a single-read stream.
            let snapshot = response.duplicate()?;
            self.boundary.store(descriptor, snapshot).await;
        }

        Ok(Delivery::FromNetwork(response))
    }

    /// Get cache statistics
    ///
    /// Returns (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Log current cache metrics
    pub fn log_metrics(&self) {
        let (hits, misses) = self.stats();
        debug!(hits = hits, misses = misses, "Offline store metrics");
    }
}
