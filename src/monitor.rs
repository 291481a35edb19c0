//! Performance Monitor
//!
//! Process-wide counters for upstream call durations (per operation) and
//! cache hits/misses (per cache type). Recording is synchronous and cheap so
//! it can be called from any number of in-flight requests.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::info;

use crate::cache::hit_ratio_percent;

/// Suffix of the operation name under which failed calls are timed.
pub const ERROR_SUFFIX: &str = "_error";

// == Streaming timings ==
#[derive(Debug, Clone, Copy, Default)]
struct CallTimings {
    count: u64,
    total_secs: f64,
    min_secs: f64,
    max_secs: f64,
}

impl CallTimings {
    fn record(&mut self, secs: f64) {
        if self.count == 0 {
            self.min_secs = secs;
            self.max_secs = secs;
        } else {
            self.min_secs = self.min_secs.min(secs);
            self.max_secs = self.max_secs.max(secs);
        }
        self.count += 1;
        self.total_secs += secs;
    }

    fn summary(&self) -> CallSummary {
        CallSummary {
            avg_secs: self.total_secs / self.count as f64,
            max_secs: self.max_secs,
            min_secs: self.min_secs,
            calls: self.count,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct HitMiss {
    hits: u64,
    misses: u64,
}

// == Summary types ==
/// Duration statistics of one operation, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallSummary {
    pub avg_secs: f64,
    pub max_secs: f64,
    pub min_secs: f64,
    pub calls: u64,
}

/// Lookup statistics of one cache type as seen by the cache-aside layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheTypeSummary {
    /// Percentage of hits
    pub hit_ratio: f64,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitorSummary {
    /// Time of construction or last reset
    pub since: DateTime<Utc>,
    pub uptime_secs: u64,
    /// Uptime as `H:MM:SS`
    pub uptime: String,
    pub total_api_calls: u64,
    pub api_stats: BTreeMap<String, CallSummary>,
    pub cache_stats: BTreeMap<String, CacheTypeSummary>,
}

#[derive(Debug)]
struct MonitorState {
    timings: HashMap<String, CallTimings>,
    cache: HashMap<String, HitMiss>,
    total_calls: u64,
    since: DateTime<Utc>,
    started: Instant,
}

impl MonitorState {
    fn new() -> Self {
        Self {
            timings: HashMap::new(),
            cache: HashMap::new(),
            total_calls: 0,
            since: Utc::now(),
            started: Instant::now(),
        }
    }
}

// == Performance Monitor ==
/// Shared metrics sink; construct once and share through an `Arc`.
#[derive(Debug)]
pub struct PerformanceMonitor {
    state: Mutex<MonitorState>,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MonitorState::new()),
        }
    }

    /// Records one upstream call of `operation` that took `duration`.
    pub fn record_call(&self, operation: &str, duration: Duration) {
        let mut state = self.state.lock();
        state
            .timings
            .entry(operation.to_string())
            .or_default()
            .record(duration.as_secs_f64());
        state.total_calls += 1;
    }

    pub fn record_cache_hit(&self, cache_type: &str) {
        self.state
            .lock()
            .cache
            .entry(cache_type.to_string())
            .or_default()
            .hits += 1;
    }

    pub fn record_cache_miss(&self, cache_type: &str) {
        self.state
            .lock()
            .cache
            .entry(cache_type.to_string())
            .or_default()
            .misses += 1;
    }

    /// Awaits `fut` and records its duration.
    ///
    /// Successful calls are recorded under `operation`, failed ones under
    /// `operation` + [`ERROR_SUFFIX`]. The result is returned untouched.
    pub async fn timed<T, E, F>(&self, operation: &str, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let result = fut.await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => self.record_call(operation, elapsed),
            Err(_) => self.record_call(&format!("{operation}{ERROR_SUFFIX}"), elapsed),
        }
        result
    }

    pub fn summary(&self) -> MonitorSummary {
        let state = self.state.lock();
        let uptime = state.started.elapsed();

        let api_stats = state
            .timings
            .iter()
            .filter(|(_, timings)| timings.count > 0)
            .map(|(name, timings)| (name.clone(), timings.summary()))
            .collect();

        let cache_stats = state
            .cache
            .iter()
            .filter(|(_, counts)| counts.hits + counts.misses > 0)
            .map(|(name, counts)| {
                let summary = CacheTypeSummary {
                    hit_ratio: hit_ratio_percent(counts.hits, counts.misses),
                    hits: counts.hits,
                    misses: counts.misses,
                };
                (name.clone(), summary)
            })
            .collect();

        MonitorSummary {
            since: state.since,
            uptime_secs: uptime.as_secs(),
            uptime: format_uptime(uptime),
            total_api_calls: state.total_calls,
            api_stats,
            cache_stats,
        }
    }

    /// Zeroes every counter and restarts the uptime clock.
    pub fn reset(&self) {
        *self.state.lock() = MonitorState::new();
        info!("Performance counters reset");
    }
}

/// Renders a duration as `H:MM:SS`, hours unbounded.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
