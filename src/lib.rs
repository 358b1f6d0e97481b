//! Query Cache - An admission-gated in-memory result cache
//!
//! Remembers query results keyed by a fingerprint, refuses to cache keys
//! until they have been requested a few times, refreshes stale entries on
//! write, and reaps old state in the background.

pub mod cache;
pub mod config;
pub mod error;
pub mod service;
mod tasks;

pub use cache::{CacheDetails, CacheStats, QueryKey, SweepReport};
pub use config::{Config, Ttl};
pub use error::{CacheError, Result};
pub use service::CacheService;
