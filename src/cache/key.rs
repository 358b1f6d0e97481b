//! Query Key Module
//!
//! Trait for the fingerprints the cache is keyed by.

use std::hash::Hash;
use std::sync::Arc;

// == Query Key ==
/// A stable, comparable query fingerprint.
///
/// Callers are expected to pass something like a serialized query string;
/// the cache compares keys by plain equality and never normalizes them.
pub trait QueryKey: Eq + Hash + Clone + Send + Sync + 'static {
    /// Length of the key in characters, used by the size estimate.
    fn key_len(&self) -> usize;
}

impl QueryKey for String {
    fn key_len(&self) -> usize {
        self.chars().count()
    }
}

impl QueryKey for &'static str {
    fn key_len(&self) -> usize {
        self.chars().count()
    }
}

impl QueryKey for Box<str> {
    fn key_len(&self) -> usize {
        self.chars().count()
    }
}

impl QueryKey for Arc<str> {
    fn key_len(&self) -> usize {
        self.chars().count()
    }
}
