//! Cache Module
//!
//! Provides admission-gated in-memory caching with write-time TTL refresh
//! and age-based reaping.

mod admission;
mod diagnostics;
mod entry;
mod key;
mod stats;
mod store;


// Re-export public types
pub use diagnostics::{CacheDetails, MEMORY_UNAVAILABLE, TIMESTAMP_OVERHEAD_BYTES};
pub use key::QueryKey;
pub use stats::CacheStats;
pub use store::SweepReport;

// Tables stay internal; callers go through `CacheService`
pub(crate) use admission::AdmissionTracker;
pub(crate) use entry::CacheEntry;
pub(crate) use store::CacheStore;

// == Public Constants ==
/// Default refresh TTL in seconds (24 hours)
pub const DEFAULT_TTL_SECS: u64 = 86_400;

/// Default reaper retention window in seconds (24 hours)
pub const DEFAULT_RETENTION_SECS: u64 = 86_400;

/// Rejected writes a key needs before it is admitted
pub const DEFAULT_ADMISSION_THRESHOLD: usize = 2;
