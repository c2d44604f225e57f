//! Configuration Module
//!
//! Handles loading and managing process configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{
    CacheConfig, EvictionStrategy, DEFAULT_CLEANUP_INTERVAL, DEFAULT_MAX_ENTRIES, DEFAULT_TTL,
};

/// Process configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Background cleanup task interval in milliseconds
    pub cleanup_interval_ms: u64,
    /// Eviction strategy used when the cache is full
    pub eviction_strategy: EvictionStrategy,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Missing, unparseable or zero values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CLEANUP_INTERVAL_MS` - Cleanup frequency in milliseconds (default: 60000)
    /// - `EVICTION_STRATEGY` - `lru`, `fifo` or `random` (default: lru)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: positive_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl_ms: positive_var("DEFAULT_TTL_MS").unwrap_or(defaults.default_ttl_ms),
            cleanup_interval_ms: positive_var("CLEANUP_INTERVAL_MS")
                .unwrap_or(defaults.cleanup_interval_ms),
            eviction_strategy: parsed_var("EVICTION_STRATEGY")
                .unwrap_or(defaults.eviction_strategy),
            server_port: parsed_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Builds the cache engine configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new()
            .max_entries(self.max_entries)
            .default_ttl(Duration::from_millis(self.default_ttl_ms))
            .cleanup_interval(Duration::from_millis(self.cleanup_interval_ms))
            .eviction_strategy(self.eviction_strategy)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl_ms: DEFAULT_TTL.as_millis() as u64,
            cleanup_interval_ms: DEFAULT_CLEANUP_INTERVAL.as_millis() as u64,
            eviction_strategy: EvictionStrategy::default(),
            server_port: 3000,
        }
    }
}

fn parsed_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

fn positive_var<T: FromStr + Default + PartialEq>(name: &str) -> Option<T> {
    parsed_var(name).filter(|v: &T| *v != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.cleanup_interval_ms, 60_000);
        assert_eq!(config.eviction_strategy, EvictionStrategy::Lru);
        assert_eq!(config.server_port, 3000);
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the environment to avoid races between tests
        env::remove_var("MAX_ENTRIES");
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("CLEANUP_INTERVAL_MS");
        env::remove_var("EVICTION_STRATEGY");
        env::remove_var("SERVER_PORT");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl_ms, 300_000);
        assert_eq!(config.eviction_strategy, EvictionStrategy::Lru);

        env::set_var("MAX_ENTRIES", "25");
        env::set_var("DEFAULT_TTL_MS", "0");
        env::set_var("EVICTION_STRATEGY", "fifo");
        env::set_var("CLEANUP_INTERVAL_MS", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.max_entries, 25);
        assert_eq!(config.default_ttl_ms, 300_000, "zero TTL falls back");
        assert_eq!(config.eviction_strategy, EvictionStrategy::Fifo);
        assert_eq!(config.cleanup_interval_ms, 60_000);

        env::remove_var("MAX_ENTRIES");
        env::remove_var("DEFAULT_TTL_MS");
        env::remove_var("EVICTION_STRATEGY");
        env::remove_var("CLEANUP_INTERVAL_MS");
    }

    #[test]
    fn test_cache_config_conversion() {
        let config = Config {
            max_entries: 10,
            default_ttl_ms: 1_500,
            cleanup_interval_ms: 250,
            eviction_strategy: EvictionStrategy::Random,
            server_port: 8080,
        };

        let cache_config = config.cache_config();
        assert_eq!(cache_config.max_entries, 10);
        assert_eq!(cache_config.default_ttl, Duration::from_millis(1_500));
        assert_eq!(cache_config.cleanup_interval, Duration::from_millis(250));
        assert_eq!(cache_config.eviction_strategy, EvictionStrategy::Random);
        assert!(cache_config.validate().is_ok());
    }
}
