//! Reaper Task
//!
//! Background task that periodically drops cache entries and admission
//! records older than the retention window.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, QueryKey};

/// Spawns a background task that periodically reaps the cache store.
///
/// The task runs in an infinite loop, sleeping for `interval` between
/// sweeps. Each sweep holds the store's write lock for its whole duration,
/// so it never interleaves with a cache write.
///
/// # Arguments
/// * `cache` - Shared reference to the cache store
/// * `interval` - Time between sweeps
/// * `retention` - Age past which entries and admission records are dropped
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it on shutdown.
pub fn spawn_reaper_task<K, V>(
    cache: Arc<RwLock<CacheStore<K, V>>>,
    interval: Duration,
    retention: Duration,
) -> JoinHandle<()>
where
    K: QueryKey,
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting reaper with interval of {:?} and retention of {:?}",
            interval, retention
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = {
                let mut cache_guard = cache.write().await;
                cache_guard.reap(retention)
            };

            if report.is_empty() {
                debug!("Reaper sweep: nothing to remove");
            } else {
                info!(
                    "Reaper sweep: removed {} entries and {} admission records",
                    report.entries_removed, report.records_removed
                );
            }
        }
    })
}
