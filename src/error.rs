//! Error types for the query cache
//!
//! Provides unified error handling using thiserror. None of these cross the
//! public cache operations; they surface from configuration parsing and are
//! recovered locally by the diagnostics path.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the query cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// TTL input was not a non-negative finite number of seconds
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// A cached value could not be serialized for size estimation
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the query cache.
pub type Result<T> = std::result::Result<T, CacheError>;
