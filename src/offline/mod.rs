//! Offline cache engine - cache-first asset serving
//!
//! Pre-populates a fixed asset list at activation and answers intercepted
//! fetches from the store before touching the network. The concrete runtime
//! that intercepts fetches is an external collaborator; it drives the engine
//! through `OfflineCacheManager::activate` and `intercept`.

mod assets;
mod boundary;
mod manager;
mod store;

pub use assets::PRELOAD_ASSETS;
pub use boundary::{
    CacheDescriptor, CachedResponse, FetchError, FetchMode, FetchRequest, FetchedResponse,
    NetworkBoundary, ResponseKind,
};
pub use manager::{Delivery, OfflineCacheManager};
pub use store::{HttpBoundary, STORE_NAME};
