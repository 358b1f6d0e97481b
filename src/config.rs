//! Configuration Module
//!
//! Handles loading and managing cache service configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::cache::{DEFAULT_ADMISSION_THRESHOLD, DEFAULT_RETENTION_SECS, DEFAULT_TTL_SECS};
use crate::error::{CacheError, Result};

/// Shortest period the reaper is allowed to tick at.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

// == TTL ==
/// Staleness threshold for cached entries, in seconds.
///
/// Accepts either a number or a numeric string, so `"86400"`, `"2.5"`, `2`
/// and `2.5` are all valid inputs. Negative, non-finite, oversized and
/// non-numeric inputs are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(Duration);

impl Ttl {
    /// Builds a TTL from a (possibly fractional) number of seconds.
    ///
    /// Rejects values a `Duration` cannot hold: negative, non-finite, or
    /// beyond `Duration::MAX`.
    pub fn from_secs_f64(secs: f64) -> Result<Self> {
        Duration::try_from_secs_f64(secs)
            .map(Self)
            .map_err(|_| CacheError::InvalidTtl(secs.to_string()))
    }

    /// Returns the TTL as a `Duration`.
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}

impl Default for Ttl {
    fn default() -> Self {
        Self(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl FromStr for Ttl {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let secs: f64 = trimmed
            .parse()
            .map_err(|_| CacheError::InvalidTtl(trimmed.to_string()))?;
        Self::from_secs_f64(secs)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for Ttl {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawTtl {
            Number(f64),
            Text(String),
        }

        let ttl = match RawTtl::deserialize(deserializer)? {
            RawTtl::Number(secs) => Ttl::from_secs_f64(secs),
            RawTtl::Text(text) => text.parse(),
        };
        ttl.map_err(serde::de::Error::custom)
    }
}

// == Config ==
/// Cache service configuration parameters.
///
/// The three time values are independent: `ttl` decides when an existing
/// entry is stale enough to be replaced on write, `sweep_interval` is how
/// often the reaper runs, and `retention` is the age past which the reaper
/// drops entries and admission records.
#[derive(Debug, Clone)]
pub struct Config {
    /// Staleness threshold for write-time refresh
    pub ttl: Ttl,
    /// Reaper period; defaults to the TTL value read as seconds
    pub sweep_interval: Duration,
    /// Age limit enforced by the reaper
    pub retention: Duration,
    /// Number of rejected writes a key needs before it is admitted
    pub admission_threshold: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `QUERY_CACHE_TTL` - Refresh TTL in seconds, integer or decimal (default: 86400)
    /// - `QUERY_CACHE_SWEEP_INTERVAL` - Reaper period in seconds (default: the TTL)
    /// - `QUERY_CACHE_RETENTION` - Reaper retention window in seconds (default: 86400)
    /// - `QUERY_CACHE_ADMISSION_THRESHOLD` - Writes rejected before admission (default: 2)
    pub fn from_env() -> Self {
        let ttl: Ttl = env_or("QUERY_CACHE_TTL", Ttl::default());
        let sweep_interval = env_or("QUERY_CACHE_SWEEP_INTERVAL", ttl);
        let retention: Ttl = env_or(
            "QUERY_CACHE_RETENTION",
            Ttl::from(DEFAULT_RETENTION_SECS),
        );

        Self {
            ttl,
            sweep_interval: sweep_interval.as_duration(),
            retention: retention.as_duration(),
            admission_threshold: env_or(
                "QUERY_CACHE_ADMISSION_THRESHOLD",
                DEFAULT_ADMISSION_THRESHOLD,
            ),
        }
    }

    /// Creates a default Config with the given TTL, sweeping at the same period.
    pub fn with_ttl(ttl: impl Into<Ttl>) -> Self {
        let ttl = ttl.into();
        Self {
            ttl,
            sweep_interval: ttl.as_duration(),
            ..Self::default()
        }
    }

    /// Overrides the reaper period.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Overrides the reaper retention window.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Overrides the admission threshold.
    pub fn with_admission_threshold(mut self, threshold: usize) -> Self {
        self.admission_threshold = threshold;
        self
    }

    /// Reaper period actually used, clamped to at least one second.
    pub fn effective_sweep_interval(&self) -> Duration {
        self.sweep_interval.max(MIN_SWEEP_INTERVAL)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: Ttl::default(),
            sweep_interval: Duration::from_secs(DEFAULT_TTL_SECS),
            retention: Duration::from_secs(DEFAULT_RETENTION_SECS),
            admission_threshold: DEFAULT_ADMISSION_THRESHOLD,
        }
    }
}

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or invalid.
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(name) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(err) => {
                warn!("Ignoring invalid {}={:?}: {}", name, raw, err);
                default
            }
        },
        Err(_) => default,
    }
}
