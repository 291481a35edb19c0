//! Cache-aside composition
//!
//! Consults the cache for a [`CacheKey`], runs the wrapped operation only on a
//! miss and stores its successful result. Hits and misses are reported to the
//! [`PerformanceMonitor`] under the key's cache type.
//!
//! Concurrent misses on one key are not coalesced: both callers run the
//! operation and the later result wins.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{CacheBackend, CacheKey, CachePayload, CacheRegistry, Payload};
use crate::monitor::PerformanceMonitor;

/// Shared cache-aside front for the response caches.
#[derive(Clone)]
pub struct CacheAside {
    registry: Arc<CacheRegistry<Payload>>,
    monitor: Arc<PerformanceMonitor>,
}

impl CacheAside {
    pub fn new(registry: Arc<CacheRegistry<Payload>>, monitor: Arc<PerformanceMonitor>) -> Self {
        Self { registry, monitor }
    }

    /// Returns the cached value for `key` or runs `op` and caches its `Ok`.
    ///
    /// An `Err` from `op` is returned unchanged and nothing is stored.
    pub async fn cached<T, E, F, Fut>(&self, key: &CacheKey, op: F) -> Result<T, E>
    where
        T: CachePayload + Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let label = key.label();

        let Some(encoded) = key.encode() else {
            warn!(
                operation = key.operation(),
                reason = key.invalid_reason().unwrap_or_default(),
                "Cache key not encodable, bypassing cache"
            );
            self.monitor.record_cache_miss(label);
            return op().await;
        };

        let store = self.registry.resolve(label);

        if let Some(value) = lookup::<T>(store.as_ref(), &encoded) {
            self.monitor.record_cache_hit(label);
            return Ok(value);
        }

        self.monitor.record_cache_miss(label);
        let value = op().await?;
        store.as_ref().set(encoded, value.clone().into_payload());
        debug!(cache = label, operation = key.operation(), "Cached fresh result");
        Ok(value)
    }

    pub fn registry(&self) -> &Arc<CacheRegistry<Payload>> {
        &self.registry
    }

    pub fn monitor(&self) -> &Arc<PerformanceMonitor> {
        &self.monitor
    }
}

/// Typed read of one entry.
///
/// A payload of the wrong shape is dropped from the backend and reported as a
/// miss. The backend has already counted that read as a hit, so its counters
/// run one hit ahead of the monitor's for the type.
fn lookup<T: CachePayload>(backend: &dyn CacheBackend<Payload>, key: &str) -> Option<T> {
    let payload = backend.get(key)?;
    let value = T::from_payload(payload);
    if value.is_none() {
        warn!(key, "Cached payload has unexpected shape, dropping entry");
        backend.delete(key);
    }
    value
}
