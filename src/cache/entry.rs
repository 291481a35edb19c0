//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// `inserted_at` is set once per `set` and never refreshed by reads, so TTL is
/// absolute from insertion. `tick` is the entry's position in the LRU order.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Insertion time
    pub inserted_at: Instant,
    /// Recency tick, larger is more recent
    pub tick: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: V, tick: u64) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            tick,
        }
    }

    // == Age ==
    /// Time elapsed since insertion.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// An entry is still visible when its age equals the TTL exactly; it
    /// expires strictly after.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}
