//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with admission gating and
//! write-time TTL refresh.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::diagnostics::{available_memory_bytes, estimate_entry_size};
use crate::cache::{AdmissionTracker, CacheDetails, CacheEntry, CacheStats, QueryKey};
use crate::error::{CacheError, Result};

// == Sweep Report ==
/// Outcome of one reaper sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Cache entries removed
    pub entries_removed: usize,
    /// Admission records removed
    pub records_removed: usize,
}

impl SweepReport {
    /// Returns true if the sweep removed nothing.
    pub fn is_empty(&self) -> bool {
        self.entries_removed == 0 && self.records_removed == 0
    }
}

// == Cache Store ==
/// Admission-gated cache storage with TTL refresh.
///
/// Both the entry table and the admission records live here so that a single
/// lock around the store covers every write and every sweep.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Frequency gate for writes
    admission: AdmissionTracker<K>,
    /// Activity counters
    stats: CacheStats,
    /// Age after which an existing entry is replaced on write
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: QueryKey,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `ttl` - Age after which an existing entry is refreshed on write
    /// * `admission_threshold` - Rejected writes a key needs before admission
    pub fn new(ttl: Duration, admission_threshold: usize) -> Self {
        Self {
            entries: HashMap::new(),
            admission: AdmissionTracker::new(admission_threshold),
            stats: CacheStats::new(),
            ttl,
        }
    }

    // == Set ==
    /// Offers a value for `key`, returning whether the key is cached.
    ///
    /// The write only lands if the admission gate lets the key through. An
    /// existing entry is replaced only once it is older than the TTL;
    /// otherwise the new value is discarded and the old one kept.
    pub fn set(&mut self, key: K, value: V) -> bool {
        self.set_at(key, value, Instant::now())
    }

    fn set_at(&mut self, key: K, value: V, now: Instant) -> bool {
        if !self.admission.should_admit(&key, now) {
            self.stats.record_rejection();
            return false;
        }

        let age = self.entries.get(&key).map(|entry| entry.age(now));
        match age {
            None => {
                self.entries.insert(key, CacheEntry::new(value, now));
            }
            Some(age) if age > self.ttl => {
                debug!("Refreshing stale entry aged {:?}", age);
                self.entries.remove(&key);
                self.entries.insert(key, CacheEntry::new(value, now));
                self.stats.record_refresh();
            }
            Some(_) => {}
        }

        self.stats.set_total_entries(self.entries.len());
        true
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Staleness is not checked here; a stale entry is served until a write
    /// refreshes it or the reaper removes it.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Clear ==
    /// Empties the entry table and the admission records.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.admission.clear();
        self.stats.set_total_entries(0);
    }

    // == Reap ==
    /// Removes entries and admission records older than `retention`.
    pub fn reap(&mut self, retention: Duration) -> SweepReport {
        self.reap_at(retention, Instant::now())
    }

    fn reap_at(&mut self, retention: Duration, now: Instant) -> SweepReport {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_older_than(retention, now));

        let report = SweepReport {
            entries_removed: before - self.entries.len(),
            records_removed: self.admission.reap(retention, now),
        };

        self.stats.record_sweep(report.entries_removed, report.records_removed);
        self.stats.set_total_entries(self.entries.len());
        report
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of pending admission records.
    #[allow(dead_code)]
    pub fn pending_admissions(&self) -> usize {
        self.admission.len()
    }

    /// Returns the refresh TTL.
    #[allow(dead_code)]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<K, V> CacheStore<K, V>
where
    K: QueryKey,
    V: Clone + Serialize,
{
    // == Details ==
    /// Computes a diagnostics snapshot.
    ///
    /// Fails if any cached value cannot be serialized.
    pub fn details(&self) -> Result<CacheDetails> {
        let mut size: usize = 0;
        for (key, entry) in &self.entries {
            size = size
                .checked_add(estimate_entry_size(key, &entry.value)?)
                .ok_or_else(|| CacheError::Internal("cache size estimate overflowed".into()))?;
        }

        Ok(CacheDetails {
            cache_size_in_bytes: size,
            available_memory_in_bytes: available_memory_bytes(),
            cache_item_count: self.entries.len(),
            temp_query_count: self.admission.len(),
            captured_at: Utc::now(),
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(2);
    const DAY: Duration = Duration::from_secs(86_400);

    fn new_store() -> CacheStore<String, i64> {
        CacheStore::new(TTL, 2)
    }

    /// Pushes `key` through the admission gate and stores `value`.
    fn admit(store: &mut CacheStore<String, i64>, key: &str, value: i64, now: Instant) {
        assert!(!store.set_at(key.to_string(), value, now));
        assert!(!store.set_at(key.to_string(), value, now));
        assert!(store.set_at(key.to_string(), value, now));
    }

    #[test]
    fn test_store_new() {
        let store = new_store();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.pending_admissions(), 0);
        assert_eq!(store.ttl(), TTL);
    }

    #[test]
    fn test_store_admits_on_third_write() {
        let mut store = new_store();

        assert!(!store.set("q1".to_string(), 10));
        assert_eq!(store.get(&"q1".to_string()), None);
        assert!(!store.set("q1".to_string(), 10));
        assert!(store.set("q1".to_string(), 10));

        assert_eq!(store.get(&"q1".to_string()), Some(10));
        assert_eq!(store.len(), 1);
        assert_eq!(store.pending_admissions(), 2);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = new_store();
        assert_eq!(store.get(&"nonexistent".to_string()), None);
    }

    #[test]
    fn test_store_no_overwrite_within_ttl() {
        let mut store = new_store();
        let now = Instant::now();
        admit(&mut store, "q1", 10, now);

        assert!(store.set_at("q1".to_string(), 99, now + TTL));
        assert_eq!(store.get(&"q1".to_string()), Some(10));
    }

    #[test]
    fn test_store_refresh_after_ttl() {
        let mut store = new_store();
        let now = Instant::now();
        admit(&mut store, "q1", 10, now);

        let later = now + Duration::from_secs(3);
        assert!(store.set_at("q1".to_string(), 99, later));
        assert_eq!(store.get(&"q1".to_string()), Some(99));

        // Timestamp was reset, so a write right after is a no-op
        assert!(store.set_at("q1".to_string(), 7, later + Duration::from_secs(1)));
        assert_eq!(store.get(&"q1".to_string()), Some(99));
        assert_eq!(store.stats().refreshes, 1);
    }

    #[test]
    fn test_store_get_ignores_staleness() {
        let mut store: CacheStore<String, i64> = CacheStore::new(Duration::ZERO, 2);
        admit(&mut store, "q1", 10, Instant::now());
        std::thread::sleep(Duration::from_millis(10));

        // Reads never evict, even if the entry is past its TTL
        assert_eq!(store.get(&"q1".to_string()), Some(10));
    }

    #[test]
    fn test_store_clear_restarts_admission() {
        let mut store = new_store();
        admit(&mut store, "q1", 10, Instant::now());

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.pending_admissions(), 0);
        assert_eq!(store.get(&"q1".to_string()), None);

        assert!(!store.set("q1".to_string(), 10));
        assert!(!store.set("q1".to_string(), 10));
        assert!(store.set("q1".to_string(), 10));
    }

    #[test]
    fn test_store_reap_removes_old_entries() {
        let mut store = new_store();
        let start = Instant::now();
        admit(&mut store, "old", 1, start);
        admit(&mut store, "new", 2, start + Duration::from_secs(3600));

        let report = store.reap_at(DAY, start + DAY + Duration::from_secs(1));
        assert_eq!(report.entries_removed, 1);
        assert_eq!(report.records_removed, 2);
        assert_eq!(store.get(&"old".to_string()), None);
        assert_eq!(store.get(&"new".to_string()), Some(2));
        assert_eq!(store.pending_admissions(), 2);

        let stats = store.stats();
        assert_eq!(stats.reaped_entries, 1);
        assert_eq!(stats.reaped_records, 2);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_reap_keeps_young_state() {
        let mut store = new_store();
        admit(&mut store, "q1", 1, Instant::now());

        let report = store.reap(DAY);
        assert!(report.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = new_store();
        admit(&mut store, "q1", 1, Instant::now());
        store.get(&"q1".to_string());
        store.get(&"missing".to_string());

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.admission_rejections, 2);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_details() {
        let mut store: CacheStore<String, String> = CacheStore::new(TTL, 2);
        let details = store.details().unwrap();
        assert_eq!(details.cache_size_in_bytes, 0);
        assert_eq!(details.cache_item_count, 0);

        store.set("q1".to_string(), "abc".to_string());
        store.set("q1".to_string(), "abc".to_string());
        store.set("q1".to_string(), "abc".to_string());
        store.set("q2".to_string(), "abc".to_string());

        let details = store.details().unwrap();
        assert_eq!(details.cache_size_in_bytes, 2 * 2 + 2 * 5 + 8);
        assert_eq!(details.cache_item_count, 1);
        assert_eq!(details.temp_query_count, 3);
    }
}
