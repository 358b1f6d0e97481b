//! Admission Tracker Module
//!
//! Frequency gate deciding whether a key has been requested often enough to
//! be materialized in the cache.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{QueryKey, DEFAULT_ADMISSION_THRESHOLD};

// == Admission Record ==
/// One observed write attempt for a key that is not admitted yet.
#[derive(Debug, Clone)]
pub struct AdmissionRecord<K> {
    /// The candidate key
    pub query_key: K,
    /// When the attempt was observed
    pub registered_at: Instant,
}

// == Admission Tracker ==
/// Counts write attempts per key and admits a key once enough have piled up.
///
/// Records are kept in arrival order:
/// - Front = Oldest observation
/// - Back = Newest observation
///
/// With the default threshold of 2 a key is rejected twice and admitted on
/// its third attempt. Once admitted, further attempts do not add records, so
/// the key stays admitted until the reaper ages its records out.
#[derive(Debug)]
pub struct AdmissionTracker<K> {
    /// Pending observations in arrival order
    records: VecDeque<AdmissionRecord<K>>,
    /// Number of records a key needs before it is admitted
    threshold: usize,
}

impl<K: QueryKey> AdmissionTracker<K> {
    // == Constructor ==
    /// Creates an empty tracker admitting keys after `threshold` rejections.
    pub fn new(threshold: usize) -> Self {
        Self {
            records: VecDeque::new(),
            threshold,
        }
    }

    // == Should Admit ==
    /// Decides whether `key` may be cached, recording the attempt if not.
    pub fn should_admit(&mut self, key: &K, now: Instant) -> bool {
        let seen = self
            .records
            .iter()
            .filter(|record| record.query_key == *key)
            .count();

        if seen >= self.threshold {
            return true;
        }

        self.records.push_back(AdmissionRecord {
            query_key: key.clone(),
            registered_at: now,
        });
        debug!(
            "Admission deferred: {} of {} observations recorded",
            seen + 1,
            self.threshold
        );
        false
    }

    // == Reap ==
    /// Drops every record that is not strictly younger than `retention`.
    ///
    /// Returns the number of records removed.
    pub fn reap(&mut self, retention: Duration, now: Instant) -> usize {
        let before = self.records.len();
        self.records
            .retain(|record| now.saturating_duration_since(record.registered_at) < retention);
        before - self.records.len()
    }

    // == Clear ==
    /// Forgets every observation.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    // == Length ==
    /// Returns the number of pending records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    // == Is Empty ==
    /// Returns true if no records are pending.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the configured threshold.
    #[allow(dead_code)]
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

impl<K: QueryKey> Default for AdmissionTracker<K> {
    fn default() -> Self {
        Self::new(DEFAULT_ADMISSION_THRESHOLD)
    }
}
