//! LRU Order Module
//!
//! Tracks recency for Least Recently Used eviction.

use std::collections::BTreeMap;

// == LRU Order ==
/// Recency index mapping a monotonically increasing tick to its key.
///
/// - Smallest tick = least recently used
/// - Largest tick = most recently used
///
/// Each tracked key owns exactly one tick; the owning entry remembers it so a
/// touch or removal is a keyed lookup rather than a scan.
#[derive(Debug, Default)]
pub struct LruOrder {
    order: BTreeMap<u64, String>,
    next_tick: u64,
}

impl LruOrder {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Places a key at the most-recently-used end and returns its tick.
    pub fn push(&mut self, key: &str) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        self.order.insert(tick, key.to_string());
        tick
    }

    // == Touch ==
    /// Moves the key owning `tick` to the most-recently-used end.
    ///
    /// Returns the new tick.
    pub fn touch(&mut self, tick: u64, key: &str) -> u64 {
        self.order.remove(&tick);
        self.push(key)
    }

    // == Remove ==
    /// Forgets a tick.
    pub fn remove(&mut self, tick: u64) {
        self.order.remove(&tick);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if nothing is tracked.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let mut lru = LruOrder::new();
        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut lru = LruOrder::new();

        lru.push("key1");
        lru.push("key2");
        lru.push("key3");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.evict_oldest().as_deref(), Some("key1"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("key2"));
    }

    #[test]
    fn test_touch_moves_to_most_recent() {
        let mut lru = LruOrder::new();

        let a = lru.push("a");
        lru.push("b");
        lru.push("c");

        lru.touch(a, "a");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.evict_oldest(), Some("b".to_string()));
        assert_eq!(lru.evict_oldest(), Some("c".to_string()));
        assert_eq!(lru.evict_oldest(), Some("a".to_string()));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_touch_returns_fresh_tick() {
        let mut lru = LruOrder::new();

        let first = lru.push("a");
        let second = lru.touch(first, "a");
        let third = lru.touch(second, "a");

        assert!(first < second && second < third);
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut lru = LruOrder::new();

        lru.push("key1");
        let key2 = lru.push("key2");
        lru.push("key3");

        lru.remove(key2);

        assert_eq!(lru.len(), 2);
        assert_eq!(lru.evict_oldest(), Some("key1".to_string()));
        assert_eq!(lru.evict_oldest(), Some("key3".to_string()));
    }

    #[test]
    fn test_remove_unknown_tick_is_noop() {
        let mut lru = LruOrder::new();
        lru.push("key1");

        lru.remove(42);

        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut lru = LruOrder::new();
        lru.push("a");
        lru.push("b");

        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.evict_oldest(), None);
    }
}
