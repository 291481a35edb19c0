//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU ordering and TTL
//! expiration, shared behind a mutex with its background sweeper.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheMetrics, CacheStats, LruOrder};
use crate::config::CacheSettings;
use crate::tasks::spawn_sweep_task;

/// Lower bound of the sweep period, for very short TTLs.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

// == Store State ==
/// Entries, recency order and counters; only ever touched under the store lock.
#[derive(Debug)]
pub(crate) struct StoreState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruOrder,
    stats: CacheStats,
    ttl: Duration,
    max_size: usize,
}

impl<V> StoreState<V> {
    pub(crate) fn new(settings: CacheSettings) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruOrder::new(),
            stats: CacheStats::new(),
            ttl: settings.ttl(),
            max_size: settings.max_size,
        }
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                self.lru.remove(entry.tick);
                true
            }
            None => false,
        }
    }

    fn set(&mut self, key: String, value: V) {
        if self.max_size == 0 {
            return;
        }

        // A full store gives up its LRU entry even when `key` is already present
        if self.entries.len() >= self.max_size {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_evictions(1);
            }
        }
        self.remove_entry(&key);

        let tick = self.lru.push(&key);
        self.entries.insert(key, CacheEntry::new(value, tick));
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    /// Removes every entry older than the TTL, counting each as an eviction.
    pub(crate) fn sweep_expired(&mut self) -> usize {
        let ttl = self.ttl;
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        self.stats.record_evictions(expired.len() as u64);
        expired.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<V: Clone> StoreState<V> {
    fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(self.ttl),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_evictions(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        let entry = self.entries.get_mut(key)?;
        entry.tick = self.lru.touch(entry.tick, key);
        Some(entry.value.clone())
    }
}

// == Cache Store ==
/// Bounded TTL + LRU store for one cache type.
///
/// All operations are synchronous and take the same exclusive section, so the
/// sweeper (a separate task, possibly on another worker thread) never sees an
/// entry without its recency tick or vice versa.
pub struct CacheStore<V> {
    name: String,
    settings: CacheSettings,
    state: Arc<Mutex<StoreState<V>>>,
    sweeper: Option<JoinHandle<()>>,
}

impl<V: Clone + Send + 'static> CacheStore<V> {
    // == Constructor ==
    /// Creates a store without a background sweeper.
    ///
    /// Expired entries are then only reclaimed on read or by calling
    /// [`CacheStore::sweep_expired`].
    pub fn new(name: impl Into<String>, settings: CacheSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            state: Arc::new(Mutex::new(StoreState::new(settings))),
            sweeper: None,
        }
    }

    /// Creates a store and starts its sweeper on the current tokio runtime.
    ///
    /// Outside a runtime the store is returned without a sweeper.
    pub fn spawn(name: impl Into<String>, settings: CacheSettings) -> Self {
        let mut store = Self::new(name, settings);

        if tokio::runtime::Handle::try_current().is_ok() {
            store.sweeper = Some(spawn_sweep_task(
                store.name.clone(),
                Arc::downgrade(&store.state),
                sweep_interval(settings.ttl()),
            ));
        } else {
            warn!(cache = %store.name, "No tokio runtime, expiry sweep disabled");
        }
        store
    }

    // == Get ==
    /// Returns a clone of the value if present and not expired.
    ///
    /// A hit moves the key to the most-recently-used end without extending
    /// its TTL. An expired entry is removed and counted as eviction + miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = self.state.lock().get(key);
        debug!(cache = %self.name, key, hit = value.is_some(), "cache lookup");
        value
    }

    // == Set ==
    /// Stores a value with a fresh timestamp at the most-recently-used end.
    ///
    /// A full store first evicts its least recently used entry, whether or not
    /// `key` is already present. Overwriting restarts the key's TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.state.lock().set(key.into(), value);
    }

    // == Delete ==
    /// Removes an entry. Returns true if it existed.
    pub fn delete(&self, key: &str) -> bool {
        self.state.lock().remove_entry(key)
    }

    // == Clear ==
    /// Removes all entries. Cumulative counters are kept.
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        self.state.lock().sweep_expired()
    }

    // == Metrics ==
    pub fn metrics(&self) -> CacheMetrics {
        let state = self.state.lock();
        state.stats.snapshot(state.len())
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// True while a background sweeper is attached.
    pub fn has_sweeper(&self) -> bool {
        self.sweeper.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<V> Drop for CacheStore<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

/// Sweep period for a TTL: half the TTL, floored at [`MIN_SWEEP_INTERVAL`].
pub fn sweep_interval(ttl: Duration) -> Duration {
    (ttl / 2).max(MIN_SWEEP_INTERVAL)
}
