//! Cache Registry Module
//!
//! Maps a cache-type name to its dedicated store, built lazily from the
//! per-type settings table.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::cache::{CacheMetrics, CacheStore};
use crate::config::CacheConfig;

// == Cache Registry ==
/// Owns one [`CacheStore`] per cache type for the life of the process.
///
/// Stores are never removed; the set only grows.
pub struct CacheRegistry<V> {
    config: CacheConfig,
    stores: Mutex<HashMap<String, Arc<CacheStore<V>>>>,
}

impl<V: Clone + Send + 'static> CacheRegistry<V> {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            stores: Mutex::new(HashMap::new()),
        }
    }

    // == Resolve ==
    /// Returns the store for `cache_type`, creating it on first use.
    ///
    /// The map lock is held while the store is built, so concurrent first
    /// calls for one type construct exactly one store.
    pub fn resolve(&self, cache_type: &str) -> Arc<CacheStore<V>> {
        let mut stores = self.stores.lock();
        if let Some(store) = stores.get(cache_type) {
            return Arc::clone(store);
        }

        let settings = self.config.settings_for(cache_type);
        info!(
            cache = cache_type,
            ttl_secs = settings.ttl_secs,
            max_size = settings.max_size,
            "Creating cache store"
        );
        let store = Arc::new(CacheStore::spawn(cache_type, settings));
        stores.insert(cache_type.to_string(), Arc::clone(&store));
        store
    }

    /// Registered cache types, sorted.
    pub fn cache_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.stores.lock().keys().cloned().collect();
        types.sort();
        types
    }

    /// Metrics snapshot of every registered store.
    pub fn metrics(&self) -> BTreeMap<String, CacheMetrics> {
        self.snapshot()
            .into_iter()
            .map(|store| (store.name().to_string(), store.metrics()))
            .collect()
    }

    // == Clear All ==
    /// Clears every registered store and returns how many were cleared.
    pub fn clear_all(&self) -> usize {
        let stores = self.snapshot();
        for store in &stores {
            store.clear();
        }
        info!(stores = stores.len(), "Cleared all caches");
        stores.len()
    }

    pub fn len(&self) -> usize {
        self.stores.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Store handles taken without holding the map lock during store operations
    fn snapshot(&self) -> Vec<Arc<CacheStore<V>>> {
        self.stores.lock().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheSettings, ASTEROIDS, MARS_PHOTOS};

    fn registry() -> CacheRegistry<String> {
        CacheRegistry::new(
            CacheConfig::default()
                .with_type(ASTEROIDS, CacheSettings::new(60, 2))
                .with_type(MARS_PHOTOS, CacheSettings::new(120, 5)),
        )
    }

    #[tokio::test]
    async fn test_resolve_returns_same_instance() {
        let registry = registry();

        let first = registry.resolve(ASTEROIDS);
        let second = registry.resolve(ASTEROIDS);

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert!(first.has_sweeper());
    }

    #[tokio::test]
    async fn test_resolve_applies_per_type_settings() {
        let registry = registry();

        assert_eq!(registry.resolve(ASTEROIDS).settings(), CacheSettings::new(60, 2));
        assert_eq!(registry.resolve("comets").settings(), CacheSettings::default());
    }

    #[tokio::test]
    async fn test_cache_types_do_not_share_counters() {
        let registry = registry();
        let asteroids = registry.resolve(ASTEROIDS);
        let mars = registry.resolve(MARS_PHOTOS);

        asteroids.set("k", "v".to_string());
        asteroids.get("k");
        asteroids.get("k");

        let metrics = registry.metrics();
        assert_eq!(metrics[ASTEROIDS].hits, 2);
        assert_eq!(metrics[MARS_PHOTOS].hits, 0);
        assert_eq!(metrics[MARS_PHOTOS].size, 0);
        assert_eq!(mars.metrics().evictions, 0);
    }

    #[tokio::test]
    async fn test_clear_all() {
        let registry = registry();
        registry.resolve(ASTEROIDS).set("a", "1".to_string());
        registry.resolve(MARS_PHOTOS).set("b", "2".to_string());

        assert_eq!(registry.clear_all(), 2);

        assert!(registry.resolve(ASTEROIDS).is_empty());
        assert!(registry.resolve(MARS_PHOTOS).is_empty());
        assert_eq!(registry.cache_types(), vec![ASTEROIDS.to_string(), MARS_PHOTOS.to_string()]);
    }

    #[test]
    fn test_metrics_do_not_create_stores() {
        let registry = registry();
        assert!(registry.metrics().is_empty());
        assert_eq!(registry.clear_all(), 0);
        assert!(registry.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_resolve_builds_one_store() {
        let registry = Arc::new(registry());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move { registry.resolve("exoplanet_info") })
            })
            .collect();

        let mut stores = Vec::new();
        for handle in handles {
            stores.push(handle.await.unwrap());
        }

        assert_eq!(registry.len(), 1);
        assert!(stores.iter().all(|s| Arc::ptr_eq(s, &stores[0])));
    }
}
