//! Cache Statistics Module
//!
//! Lifetime counters for reads, admission decisions, refreshes and reaping.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity since the store was created.
///
/// Counters are not reset by clearing the cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Reads that found a value
    pub hits: u64,
    /// Reads that found nothing
    pub misses: u64,
    /// Writes turned away by the admission gate
    pub admission_rejections: u64,
    /// Stale entries replaced on write
    pub refreshes: u64,
    /// Entries removed by the reaper
    pub reaped_entries: u64,
    /// Admission records removed by the reaper
    pub reaped_records: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_rejection(&mut self) {
        self.admission_rejections += 1;
    }

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    // == Record Sweep ==
    /// Adds the outcome of one reaper sweep.
    pub fn record_sweep(&mut self, entries: usize, records: usize) {
        self.reaped_entries += entries as u64;
        self.reaped_records += records as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
