//! Cache Service
//!
//! The in-process handle the query engine talks to. Owns the cache store and
//! the reaper task for its whole lifetime.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheDetails, CacheStats, CacheStore, QueryKey, SweepReport};
use crate::config::Config;
use crate::tasks::spawn_reaper_task;

// == Cache Service ==
/// Admission-gated result cache with a background reaper.
///
/// Construct it once with [`CacheService::start`] and hand it to the query
/// engine, usually behind an `Arc`. Call [`CacheService::stop`] on shutdown;
/// dropping the service also cancels the reaper.
///
/// None of the cache operations fail. A rejected write, a missed read and an
/// unavailable diagnostics snapshot are all ordinary outcomes.
pub struct CacheService<K, V> {
    /// Entry table and admission records behind one lock
    store: Arc<RwLock<CacheStore<K, V>>>,
    /// Reaper handle, taken on stop
    reaper: Mutex<Option<JoinHandle<()>>>,
    config: Config,
}

impl<K, V> CacheService<K, V>
where
    K: QueryKey,
    V: Clone + Serialize + Send + Sync + 'static,
{
    // == Start ==
    /// Creates the service and spawns its reaper.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: Config) -> Self {
        let store = Arc::new(RwLock::new(CacheStore::new(
            config.ttl.as_duration(),
            config.admission_threshold,
        )));
        let reaper = spawn_reaper_task(
            store.clone(),
            config.effective_sweep_interval(),
            config.retention,
        );

        info!(
            "Cache service started: ttl={}, sweep_interval={:?}, retention={:?}, admission_threshold={}",
            config.ttl,
            config.effective_sweep_interval(),
            config.retention,
            config.admission_threshold
        );

        Self {
            store,
            reaper: Mutex::new(Some(reaper)),
            config,
        }
    }

    // == Set Cache ==
    /// Offers a computed result for `key`.
    ///
    /// Returns `false` while the key is still being counted by the admission
    /// gate, `true` once it is cached. A fresh cached value is never
    /// overwritten; a stale one is replaced by `value`.
    pub async fn set_cache(&self, key: K, value: V) -> bool {
        self.store.write().await.set(key, value)
    }

    // == Get Cache ==
    /// Returns the cached result for `key`, if any.
    pub async fn get_cache(&self, key: &K) -> Option<V> {
        // Reads update hit/miss counters, hence the write lock
        self.store.write().await.get(key)
    }

    // == Clear All Cache ==
    /// Drops every cached entry and every admission record.
    pub async fn clear_all_cache(&self) {
        self.store.write().await.clear();
        info!("Cache cleared");
    }

    // == Cache Details ==
    /// Returns a diagnostics snapshot, or `None` if it could not be computed.
    pub async fn cache_details(&self) -> Option<CacheDetails> {
        match self.store.read().await.details() {
            Ok(details) => Some(details),
            Err(err) => {
                warn!("Failed to compute cache details: {}", err);
                None
            }
        }
    }

    // == Stats ==
    /// Returns lifetime activity counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Sweep Now ==
    /// Runs one reaper sweep immediately, outside the regular schedule.
    pub async fn sweep_now(&self) -> SweepReport {
        self.store.write().await.reap(self.config.retention)
    }

    /// Returns the configuration the service was started with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns true while the reaper task is alive.
    pub async fn is_running(&self) -> bool {
        self.reaper
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    // == Stop ==
    /// Cancels the reaper and waits for it to wind down.
    ///
    /// Cached data stays readable afterwards; only the periodic sweep stops.
    /// Calling it more than once is harmless.
    pub async fn stop(&self) {
        let Some(handle) = self.reaper.lock().await.take() else {
            return;
        };

        handle.abort();
        match handle.await {
            Err(err) if err.is_panic() => warn!("Reaper task panicked: {}", err),
            _ => info!("Cache service stopped"),
        }
    }
}

impl<K, V> Drop for CacheService<K, V> {
    fn drop(&mut self) {
        if let Some(handle) = self.reaper.get_mut().take() {
            handle.abort();
        }
    }
}
