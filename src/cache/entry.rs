//! Cache Entry Module
//!
//! Defines the structure for individual cache entries and their age checks.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with its value and registration time.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was last written
    pub registered_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry registered at `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            registered_at: now,
        }
    }

    // == Age ==
    /// Returns how long ago the entry was written, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.registered_at)
    }

    // == Is Older Than ==
    /// Checks whether the entry's age strictly exceeds `limit`.
    ///
    /// An entry whose age equals the limit is still fresh.
    pub fn is_older_than(&self, limit: Duration, now: Instant) -> bool {
        self.age(now) > limit
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value".to_string(), now);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.registered_at, now);
        assert_eq!(entry.age(now), Duration::ZERO);
    }

    #[test]
    fn test_entry_age() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, now);

        assert_eq!(entry.age(now + Duration::from_secs(5)), Duration::from_secs(5));
    }

    #[test]
    fn test_age_saturates_for_earlier_instant() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, now + Duration::from_secs(10));

        assert_eq!(entry.age(now), Duration::ZERO);
    }

    #[test]
    fn test_older_than_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, now);
        let limit = Duration::from_secs(2);

        assert!(!entry.is_older_than(limit, now + limit), "Age equal to limit is fresh");
        assert!(entry.is_older_than(limit, now + limit + Duration::from_millis(1)));
    }
}
