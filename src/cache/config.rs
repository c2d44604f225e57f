//! Cache Configuration Module
//!
//! Tunables for a cache instance. All of them can be changed while the cache is live.

use std::time::Duration;

use serde::Serialize;

use crate::cache::EvictionStrategy;
use crate::error::{CacheError, Result};

// == Defaults ==
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

// == Cache Config ==
/// Configuration for a cache instance.
///
/// ```
/// use std::time::Duration;
/// use tagged_cache::cache::{CacheConfig, EvictionStrategy};
///
/// let config = CacheConfig::new()
///     .max_entries(500)
///     .default_ttl(Duration::from_secs(30))
///     .eviction_strategy(EvictionStrategy::Fifo);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    /// TTL applied when a write does not supply one
    pub default_ttl: Duration,
    /// Number of entries above which a new key triggers one eviction
    pub max_entries: usize,
    /// Period of the background cleanup task
    pub cleanup_interval: Duration,
    /// Victim selection used when capacity is reached
    pub eviction_strategy: EvictionStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            eviction_strategy: EvictionStrategy::default(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }

    pub fn eviction_strategy(mut self, strategy: EvictionStrategy) -> Self {
        self.eviction_strategy = strategy;
        self
    }

    // == Validate ==
    /// Rejects zero durations and a zero capacity.
    pub fn validate(&self) -> Result<()> {
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidOptions(
                "Default TTL must be positive".to_string(),
            ));
        }
        if self.max_entries == 0 {
            return Err(CacheError::InvalidOptions(
                "Max entries must be at least 1".to_string(),
            ));
        }
        if self.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidOptions(
                "Cleanup interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
