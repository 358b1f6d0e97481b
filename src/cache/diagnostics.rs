//! Cache Diagnostics Module
//!
//! Heuristic size accounting and host memory lookup for cache snapshots.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sysinfo::System;

use crate::cache::QueryKey;
use crate::error::Result;

/// Flat per-entry overhead standing in for the timestamp.
pub const TIMESTAMP_OVERHEAD_BYTES: usize = 8;

/// Reported when the host's available memory cannot be determined.
pub const MEMORY_UNAVAILABLE: i64 = -1;

// == Cache Details ==
/// Point-in-time view of the cache's footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheDetails {
    /// Approximate size of all cached entries
    pub cache_size_in_bytes: usize,
    /// Memory the host reports as available, or -1
    pub available_memory_in_bytes: i64,
    /// Number of cached entries
    pub cache_item_count: usize,
    /// Number of pending admission records
    pub temp_query_count: usize,
    /// When the snapshot was taken
    pub captured_at: DateTime<Utc>,
}

// == Entry Size ==
/// Estimates the footprint of one entry.
///
/// Keys and serialized values are counted at two bytes per character, plus a
/// fixed overhead for the timestamp. This is a heuristic, not an allocation
/// count.
pub fn estimate_entry_size<K, V>(key: &K, value: &V) -> Result<usize>
where
    K: QueryKey,
    V: Serialize,
{
    let serialized = serde_json::to_string(value)?;
    Ok(2 * key.key_len() + 2 * serialized.chars().count() + TIMESTAMP_OVERHEAD_BYTES)
}

// == Available Memory ==
/// Returns the host's available memory in bytes, or `MEMORY_UNAVAILABLE`.
pub fn available_memory_bytes() -> i64 {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return MEMORY_UNAVAILABLE;
    }

    let mut sys = System::new();
    sys.refresh_memory();
    to_reported_bytes(sys.total_memory(), sys.available_memory())
}

/// Maps the raw memory figures to the reported value.
///
/// A host that reports no memory at all is treated as unavailable.
fn to_reported_bytes(total: u64, available: u64) -> i64 {
    if total == 0 {
        return MEMORY_UNAVAILABLE;
    }
    i64::try_from(available).unwrap_or(MEMORY_UNAVAILABLE)
}
