//! Cache backend contract
//!
//! The operations callers rely on, independent of where entries live. The
//! in-memory [`CacheStore`] implements it; a persistent backend must honor the
//! same semantics (absolute TTL from insertion, `clear` keeps the backend
//! usable) to be substituted without changing callers.

use std::time::Duration;

use crate::cache::CacheStore;

pub trait CacheBackend<V>: Send + Sync {
    /// Live value for `key`, None when absent or expired.
    fn get(&self, key: &str) -> Option<V>;
    /// Stores `value`, restarting the key's TTL.
    fn set(&self, key: String, value: V);
    /// Removes `key`; true if it was present.
    fn delete(&self, key: &str) -> bool;
    /// Removes every entry.
    fn clear(&self);
    /// Lifetime of an entry after insertion.
    fn ttl(&self) -> Duration;
}

impl<V> CacheBackend<V> for CacheStore<V>
where
    V: Clone + Send + 'static,
{
    fn get(&self, key: &str) -> Option<V> {
        CacheStore::get(self, key)
    }

    fn set(&self, key: String, value: V) {
        CacheStore::set(self, key, value)
    }

    fn delete(&self, key: &str) -> bool {
        CacheStore::delete(self, key)
    }

    fn clear(&self) {
        CacheStore::clear(self)
    }

    fn ttl(&self) -> Duration {
        self.settings().ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;

    fn exercise(backend: &dyn CacheBackend<u32>) {
        backend.set("a".to_string(), 1);
        assert_eq!(backend.get("a"), Some(1));
        assert!(backend.delete("a"));
        assert_eq!(backend.get("a"), None);

        backend.set("b".to_string(), 2);
        backend.clear();
        assert_eq!(backend.get("b"), None);

        // Still usable after clear
        backend.set("c".to_string(), 3);
        assert_eq!(backend.get("c"), Some(3));
    }

    #[test]
    fn test_store_honors_backend_contract() {
        let store: CacheStore<u32> = CacheStore::new("contract", CacheSettings::new(30, 10));
        exercise(&store);
        assert_eq!(CacheBackend::<u32>::ttl(&store), Duration::from_secs(30));
    }
}
