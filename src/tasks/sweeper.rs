//! Expiry Sweep Task
//!
//! Background task that periodically removes expired entries from one cache
//! store, so keys written once and never read again are still reclaimed.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::StoreState;

/// Spawns the sweep loop for one store.
///
/// The task sleeps `interval` between passes and takes the store lock only for
/// the duration of a pass. It holds a weak reference, so it exits on its own
/// once the store is gone; the store also aborts it when dropped.
///
/// # Arguments
/// * `name` - Cache type of the store, for logs
/// * `state` - Weak reference to the store's locked state
/// * `interval` - Period between sweeps
pub(crate) fn spawn_sweep_task<V>(
    name: String,
    state: Weak<Mutex<StoreState<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Send + 'static,
{
    tokio::spawn(async move {
        info!(cache = %name, ?interval, "Starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let Some(state) = state.upgrade() else {
                debug!(cache = %name, "Store dropped, stopping expiry sweep");
                break;
            };

            let (removed, size) = {
                let mut guard = state.lock();
                let removed = guard.sweep_expired();
                (removed, guard.len())
            };

            if removed > 0 {
                info!(cache = %name, removed, size, "Expiry sweep removed entries");
            } else {
                debug!(cache = %name, "Expiry sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::CacheStore;
    use crate::config::CacheSettings;

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_entries_never_read_again() {
        let store: CacheStore<String> = CacheStore::spawn("sweep", CacheSettings::new(1, 100));
        store.set("expire_soon", "value".to_string());

        // Sweeps run every 500ms; the entry is older than 1s at the third one
        tokio::time::sleep(Duration::from_millis(1600)).await;

        let metrics = store.metrics();
        assert_eq!(metrics.size, 0);
        assert_eq!(metrics.evictions, 1);
        // Removed by the sweeper, not by a read
        assert_eq!(metrics.misses, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_preserves_valid_entries() {
        let store: CacheStore<String> = CacheStore::spawn("sweep", CacheSettings::new(3600, 100));
        store.set("long_lived", "value".to_string());

        tokio::time::sleep(Duration::from_secs(5000)).await;
        assert_eq!(store.len(), 1);

        tokio::time::sleep(Duration::from_secs(3000)).await;
        assert_eq!(store.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_exits_once_state_is_gone() {
        let state = Arc::new(Mutex::new(StoreState::<String>::new(CacheSettings::new(1, 10))));
        let handle = spawn_sweep_task("gone".to_string(), Arc::downgrade(&state), Duration::from_millis(100));

        drop(state);
        tokio::time::sleep(Duration::from_millis(250)).await;

        assert!(handle.is_finished(), "Task should stop after its store is dropped");
    }
}
