//! Retention Sweep Task
//!
//! Background task that periodically drops in-memory entries whose stale
//! retention window has lapsed. Expired entries inside the window are kept so
//! they can still serve as a fallback.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges entries past retention.
///
/// # Arguments
/// * `cache` - Shared reference to the in-memory store
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(CacheStore::new(1000, 86_400)));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting retention sweep with interval of {} seconds",
            cleanup_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.purge_stale()
            };

            if removed > 0 {
                info!("Retention sweep: purged {} entries", removed);
            } else {
                debug!("Retention sweep: nothing to purge");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sweep_purges_entries_past_retention() {
        // No retention: entries are purgeable as soon as they expire
        let cache = Arc::new(RwLock::new(CacheStore::new(100, 0)));
        {
            let mut cache_guard = cache.write().await;
            cache_guard
                .set("expire_soon".to_string(), "value".to_string(), 1)
                .unwrap();
        }

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        {
            let mut cache_guard = cache.write().await;
            assert_eq!(cache_guard.len(), 0);
            assert!(cache_guard.get_stale("expire_soon").is_none());
            assert_eq!(cache_guard.stats().purged, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_keeps_expired_entries_within_retention() {
        let cache = Arc::new(RwLock::new(CacheStore::new(100, 3600)));
        {
            let mut cache_guard = cache.write().await;
            cache_guard
                .set("stale_soon".to_string(), "value".to_string(), 1)
                .unwrap();
        }

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(2500)).await;

        {
            let mut cache_guard = cache.write().await;
            assert!(cache_guard.get("stale_soon").is_err(), "entry should be expired");
            assert_eq!(cache_guard.get_stale("stale_soon").as_deref(), Some("value"));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(CacheStore::new(100, 300)));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
