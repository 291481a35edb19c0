//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, and evictions.

use serde::Serialize;

// == Cache Stats ==
/// Cumulative counters of one cache store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups (key absent or expired)
    pub misses: u64,
    /// Number of entries removed by LRU pressure or TTL expiry
    pub evictions: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    /// Builds a snapshot for a store currently holding `size` entries.
    pub fn snapshot(&self, size: usize) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size,
            hit_ratio: hit_ratio_percent(self.hits, self.misses),
        }
    }
}

// == Cache Metrics ==
/// Point-in-time view of a store's counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Live entries at snapshot time
    pub size: usize,
    /// hits / (hits + misses) as a percentage, 0 with no lookups
    pub hit_ratio: f64,
}

impl CacheMetrics {
    /// Hit ratio rendered with one decimal, e.g. `66.7%`.
    pub fn hit_ratio_label(&self) -> String {
        format!("{:.1}%", self.hit_ratio)
    }
}

/// Percentage of hits over all lookups, 0 when there were none.
pub fn hit_ratio_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_hit_ratio_no_requests() {
        let metrics = CacheStats::new().snapshot(0);
        assert_eq!(metrics.hit_ratio, 0.0);
        assert_eq!(metrics.hit_ratio_label(), "0.0%");
    }

    #[test]
    fn test_hit_ratio_all_hits() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        assert_eq!(stats.snapshot(1).hit_ratio, 100.0);
    }

    #[test]
    fn test_hit_ratio_mixed_one_decimal() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();

        let metrics = stats.snapshot(2);
        assert_eq!(metrics.hit_ratio_label(), "66.7%");
        assert_eq!(metrics.size, 2);
    }

    #[test]
    fn test_record_evictions() {
        let mut stats = CacheStats::new();
        stats.record_evictions(1);
        stats.record_evictions(3);
        assert_eq!(stats.evictions, 4);
    }

    #[test]
    fn test_metrics_serialize() {
        let mut stats = CacheStats::new();
        stats.record_miss();
        let json = serde_json::to_value(stats.snapshot(0)).unwrap();
        assert_eq!(json["misses"], 1);
        assert_eq!(json["hit_ratio"], 0.0);
    }
}
