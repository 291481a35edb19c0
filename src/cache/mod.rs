//! Cache Module
//!
//! Provides in-memory response caching with TTL expiration, LRU eviction,
//! per-type stores and the cache-aside front used by the upstream services.

mod aside;
mod backend;
mod entry;
mod key;
mod lru;
mod payload;
mod registry;
mod stats;
mod store;


// Re-export public types
pub use aside::CacheAside;
pub use backend::CacheBackend;
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru::LruOrder;
pub use payload::{CachePayload, Payload};
pub use registry::CacheRegistry;
pub use stats::{hit_ratio_percent, CacheMetrics, CacheStats};
pub use store::{sweep_interval, CacheStore, MIN_SWEEP_INTERVAL};

pub(crate) use store::StoreState;
