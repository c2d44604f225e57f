//! Cache Store Module
//!
//! Single-threaded cache core: insertion-ordered storage, TTL expiry, tag index,
//! eviction and statistics. Shared access goes through [`crate::cache::CacheEngine`].

use std::collections::HashSet;
use std::time::Duration;

use indexmap::IndexMap;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::cache::clock::duration_ms;
use crate::cache::{
    CacheConfig, CacheEntry, CacheStats, Clock, EvictionStrategy, KeyPattern, SetOptions,
    SystemClock, TagIndex, MAX_KEY_LENGTH,
};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Main cache storage with TTL, tags and pluggable eviction.
#[derive(Debug)]
pub struct CacheStore<T, C = SystemClock> {
    /// Key-value storage in first-insertion order
    entries: IndexMap<String, CacheEntry<T>>,
    /// Tag to keys index
    tags: TagIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Live configuration
    config: CacheConfig,
    /// Time source
    clock: C,
}

impl<T> CacheStore<T, SystemClock>
where
    T: Clone + Serialize,
{
    // == Constructor ==
    /// Creates a new CacheStore using wall-clock time.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, SystemClock)
    }
}

impl<T, C> CacheStore<T, C>
where
    T: Clone + Serialize,
    C: Clock,
{
    /// Creates a new CacheStore reading time from `clock`.
    ///
    /// Fails with `InvalidOptions` if `config` has a zero TTL, capacity or
    /// cleanup interval.
    pub fn with_clock(config: CacheConfig, clock: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: IndexMap::new(),
            tags: TagIndex::new(),
            stats: CacheStats::new(),
            config,
            clock,
        })
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// A new key arriving while the store holds `max_entries` or more first
    /// triggers one eviction pass with the configured strategy.
    ///
    /// # Arguments
    /// * `key` - Non-empty key of at most `MAX_KEY_LENGTH` bytes
    /// * `data` - The value to store
    /// * `options` - TTL, tags and version; defaults apply to missing fields
    pub fn set(&mut self, key: impl Into<String>, data: T, options: SetOptions) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;

        let ttl = options.ttl.unwrap_or(self.config.default_ttl);
        if ttl.is_zero() {
            return Err(CacheError::InvalidOptions(
                "TTL must be positive".to_string(),
            ));
        }

        let version = options.version.unwrap_or(1);
        if version == 0 {
            return Err(CacheError::InvalidOptions(
                "Version must be at least 1".to_string(),
            ));
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.config.max_entries {
            self.evict(self.config.eviction_strategy);
        }

        let tags: HashSet<String> = options.tags.into_iter().collect();
        let entry = CacheEntry::new(
            key.clone(),
            data,
            self.clock.now_ms(),
            duration_ms(ttl),
            tags,
            version,
        );

        if let Some(previous) = self.entries.get(&key) {
            self.tags.remove(&key, &previous.tags);
            self.stats.record_remove(previous.size);
        }

        self.tags.insert(&key, &entry.tags);
        self.stats.record_insert(entry.size);
        // Replacing keeps the key's original position in the map
        self.entries.insert(key, entry);

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let data = entry.data.clone();
                self.stats.record_hit();
                return Some(data);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove_entry(key);
            debug!(key, "Expired entry removed on read");
        }
        self.stats.record_miss();
        None
    }

    // == Entry ==
    /// Returns the live entry for `key` without touching statistics.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<T>> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
    }

    // == Has ==
    /// True if `key` holds an unexpired entry. Never mutates the store.
    pub fn has(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    // == Delete ==
    /// Removes an entry by key, returning whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes every entry and resets all statistics.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.tags.clear();
        self.stats.reset();
    }

    // == Clear By Tag ==
    /// Removes every entry labelled `tag`, returning the number removed.
    pub fn clear_by_tag(&mut self, tag: &str) -> usize {
        let keys = self.tags.keys_for(tag);
        let removed = keys
            .iter()
            .filter_map(|key| self.remove_entry(key))
            .inspect(|entry| debug_assert!(entry.has_tag(tag), "tag index out of step"))
            .count();

        if removed > 0 {
            debug!(
                tag,
                removed,
                remaining_tags = self.tags.tag_count(),
                "Cleared entries by tag"
            );
        }
        removed
    }

    // == Clear Expired ==
    /// Removes all expired entries, returning the number removed.
    pub fn clear_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }
        expired_keys.len()
    }

    // == Invalidate ==
    /// Removes every entry whose key matches `pattern`, returning the number removed.
    pub fn invalidate(&mut self, pattern: &KeyPattern) -> usize {
        let matching: Vec<String> = self
            .entries
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect();

        for key in &matching {
            self.remove_entry(key);
        }

        if !matching.is_empty() {
            debug!(?pattern, removed = matching.len(), "Invalidated entries by pattern");
        }
        matching.len()
    }

    // == Evict ==
    /// Removes exactly one entry chosen by `strategy` and returns its key.
    ///
    /// Does nothing on an empty store.
    pub fn evict(&mut self, strategy: EvictionStrategy) -> Option<String> {
        let victim = match strategy {
            EvictionStrategy::Lru => self
                .entries
                .values()
                .min_by_key(|entry| entry.timestamp)
                .map(|entry| entry.key.clone()),
            EvictionStrategy::Fifo => self.entries.keys().next().cloned(),
            EvictionStrategy::Random => {
                if self.entries.is_empty() {
                    None
                } else {
                    let index = rand::thread_rng().gen_range(0..self.entries.len());
                    self.entries.get_index(index).map(|(key, _)| key.clone())
                }
            }
        }?;

        self.remove_entry(&victim);
        self.stats.record_eviction();
        debug!(key = %victim, %strategy, "Evicted entry");
        Some(victim)
    }

    // == Cleanup ==
    /// Removes expired entries and records the time of the pass.
    pub fn cleanup(&mut self) -> usize {
        let removed = self.clear_expired();
        self.stats.record_cleanup(self.clock.now_ms());
        removed
    }

    // == Age ==
    /// Time since the live entry for `key` was written, `None` if absent.
    pub fn get_age(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now_ms();
        self.entry(key)
            .map(|entry| Duration::from_millis(entry.age_ms(now)))
    }

    // == Is Stale ==
    /// True if `key` is absent or older than `version` minutes.
    pub fn is_stale(&self, key: &str) -> bool {
        let now = self.clock.now_ms();
        self.entry(key)
            .map_or(true, |entry| entry.is_stale_at(now))
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    // == Keys ==
    /// Keys of all unexpired entries, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Length ==
    /// Number of entries held, including expired ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Configuration ==
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Changes the TTL used by later writes. Existing entries keep theirs.
    pub fn set_default_ttl(&mut self, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(CacheError::InvalidOptions(
                "Default TTL must be positive".to_string(),
            ));
        }
        self.config.default_ttl = ttl;
        Ok(())
    }

    /// Changes the capacity. Shrinking does not evict until the next new key.
    pub fn set_max_entries(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(CacheError::InvalidOptions(
                "Max entries must be at least 1".to_string(),
            ));
        }
        self.config.max_entries = max_entries;
        Ok(())
    }

    pub fn set_cleanup_interval(&mut self, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Err(CacheError::InvalidOptions(
                "Cleanup interval must be positive".to_string(),
            ));
        }
        self.config.cleanup_interval = interval;
        Ok(())
    }

    pub fn set_eviction_strategy(&mut self, strategy: EvictionStrategy) {
        self.config.eviction_strategy = strategy;
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Remove Entry ==
    /// Removes `key` from the map, tag index and size accounting.
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<T>> {
        let entry = self.entries.shift_remove(key)?;
        self.tags.remove(key, &entry.tags);
        self.stats.record_remove(entry.size);
        Some(entry)
    }
}

// == Key Validation ==
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MockClock;
    use serde_json::{json, Value};

    fn store_with(max_entries: usize) -> (CacheStore<Value, MockClock>, MockClock) {
        let clock = MockClock::starting_at(1_000_000);
        let config = CacheConfig::new()
            .max_entries(max_entries)
            .default_ttl(Duration::from_secs(300));
        (CacheStore::with_clock(config, clock.clone()).unwrap(), clock)
    }

    fn tagged(tag: &str) -> SetOptions {
        SetOptions::new().tag(tag)
    }

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(CacheConfig::default()).unwrap();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_rejects_invalid_config() {
        let clock = MockClock::new();
        let zero_capacity =
            CacheStore::<Value, _>::with_clock(CacheConfig::new().max_entries(0), clock.clone());
        assert!(matches!(zero_capacity, Err(CacheError::InvalidOptions(_))));

        let zero_ttl = CacheStore::<Value, _>::with_clock(
            CacheConfig::new().default_ttl(Duration::ZERO),
            clock,
        );
        assert!(matches!(zero_ttl, Err(CacheError::InvalidOptions(_))));
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with(100);

        store.set("emp:1", json!({"name": "A"}), SetOptions::default()).unwrap();

        assert_eq!(store.get("emp:1"), Some(json!({"name": "A"})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent_counts_miss() {
        let (mut store, _) = store_with(100);

        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_overwrite() {
        let (mut store, _) = store_with(100);

        store.set("key1", json!("value1"), tagged("old")).unwrap();
        store.set("key1", json!("value2"), tagged("new")).unwrap();

        assert_eq!(store.get("key1"), Some(json!("value2")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().total_entries, 1);
        assert_eq!(store.stats().total_size_bytes, "\"value2\"".len());
        // The replaced entry's tags no longer apply
        assert_eq!(store.clear_by_tag("old"), 0);
        assert_eq!(store.clear_by_tag("new"), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let (mut store, clock) = store_with(100);

        store
            .set("emp:1", json!({"name": "A"}), SetOptions::new().ttl(Duration::from_millis(1000)))
            .unwrap();
        assert_eq!(store.get("emp:1"), Some(json!({"name": "A"})));

        clock.advance(Duration::from_millis(1100));

        assert!(!store.has("emp:1"));
        assert_eq!(store.len(), 1, "has() must not delete");
        assert_eq!(store.get("emp:1"), None);
        assert_eq!(store.len(), 0, "get() removes expired entries");
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_rejects_invalid_options() {
        let (mut store, _) = store_with(100);

        let zero_ttl = store.set("k", json!(1), SetOptions::new().ttl(Duration::ZERO));
        assert!(matches!(zero_ttl, Err(CacheError::InvalidOptions(_))));

        let zero_version = store.set("k", json!(1), SetOptions::new().version(0));
        assert!(matches!(zero_version, Err(CacheError::InvalidOptions(_))));

        let empty_key = store.set("", json!(1), SetOptions::default());
        assert!(matches!(empty_key, Err(CacheError::InvalidKey(_))));

        let long_key = store.set("x".repeat(MAX_KEY_LENGTH + 1), json!(1), SetOptions::default());
        assert!(matches!(long_key, Err(CacheError::InvalidKey(_))));

        assert!(store.is_empty());
    }

    #[test]
    fn test_store_delete() {
        let (mut store, _) = store_with(100);

        store.set("key1", json!(1), SetOptions::default()).unwrap();

        assert!(store.delete("key1"));
        assert!(!store.delete("key1"));
        assert!(store.is_empty());
        assert_eq!(store.stats().total_size_bytes, 0);
    }

    #[test]
    fn test_store_clear_resets_everything() {
        let (mut store, _) = store_with(1);

        store.set("a", json!(1), tagged("x")).unwrap();
        store.set("b", json!(2), tagged("x")).unwrap(); // evicts a
        store.get("b");
        store.get("a");

        store.clear();

        assert!(!store.has("a"));
        assert!(!store.has("b"));
        assert_eq!(store.stats(), CacheStats::default());
        assert_eq!(store.clear_by_tag("x"), 0);
    }

    #[test]
    fn test_store_clear_by_tag() {
        let (mut store, _) = store_with(100);

        store.set("emp:1", json!(1), tagged("employees")).unwrap();
        store.set("emp:2", json!(2), tagged("employees")).unwrap();
        store.set("stu:1", json!(3), tagged("students")).unwrap();

        assert_eq!(store.clear_by_tag("employees"), 2);
        assert!(!store.has("emp:1"));
        assert!(!store.has("emp:2"));
        assert_eq!(store.get("stu:1"), Some(json!(3)));
        assert_eq!(store.clear_by_tag("employees"), 0);
    }

    #[test]
    fn test_store_clear_expired() {
        let (mut store, clock) = store_with(100);

        store.set("short", json!(1), SetOptions::new().ttl(Duration::from_secs(1))).unwrap();
        store.set("long", json!(2), SetOptions::new().ttl(Duration::from_secs(10))).unwrap();

        clock.advance(Duration::from_millis(1100));

        assert_eq!(store.clear_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.has("long"));
    }

    #[test]
    fn test_store_invalidate_literal_and_regex() {
        let (mut store, _) = store_with(100);

        store.set("employees:1", json!(1), SetOptions::default()).unwrap();
        store.set("employees:2", json!(2), SetOptions::default()).unwrap();
        store.set("students:1", json!(3), SetOptions::default()).unwrap();

        assert_eq!(store.invalidate(&KeyPattern::from("employees:")), 2);
        assert_eq!(store.keys(), vec!["students:1"]);

        store.set("students:2", json!(4), SetOptions::default()).unwrap();
        let pattern = KeyPattern::regex(r"^students:[12]$").unwrap();
        assert_eq!(store.invalidate(&pattern), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_lru_evicts_oldest_write() {
        let (mut store, clock) = store_with(2);

        store.set("a", json!(1), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("b", json!(2), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("c", json!(3), SetOptions::default()).unwrap();

        assert!(!store.has("a"));
        assert!(store.has("b"));
        assert!(store.has("c"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_lru_reads_do_not_refresh() {
        let (mut store, clock) = store_with(2);

        store.set("a", json!(1), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("b", json!(2), SetOptions::default()).unwrap();
        store.get("a");
        clock.advance(Duration::from_millis(10));
        store.set("c", json!(3), SetOptions::default()).unwrap();

        assert!(!store.has("a"));
        assert!(store.has("b"));
    }

    #[test]
    fn test_store_lru_rewrite_refreshes_timestamp() {
        let (mut store, clock) = store_with(2);

        store.set("a", json!(1), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("b", json!(2), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("a", json!(10), SetOptions::default()).unwrap();
        store.set("c", json!(3), SetOptions::default()).unwrap();

        assert!(store.has("a"));
        assert!(!store.has("b"));
    }

    #[test]
    fn test_store_fifo_keeps_original_position_on_rewrite() {
        let (mut store, clock) = store_with(2);
        store.set_eviction_strategy(EvictionStrategy::Fifo);

        store.set("a", json!(1), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("b", json!(2), SetOptions::default()).unwrap();
        clock.advance(Duration::from_millis(10));
        store.set("a", json!(10), SetOptions::default()).unwrap();
        store.set("c", json!(3), SetOptions::default()).unwrap();

        assert!(!store.has("a"));
        assert!(store.has("b"));
        assert!(store.has("c"));
    }

    #[test]
    fn test_store_random_eviction_removes_one() {
        let (mut store, _) = store_with(100);
        for i in 0..5 {
            store.set(format!("k{}", i), json!(i), SetOptions::default()).unwrap();
        }

        let victim = store.evict(EvictionStrategy::Random).unwrap();

        assert_eq!(store.len(), 4);
        assert!(!store.has(&victim));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_evict_empty_is_noop() {
        let (mut store, _) = store_with(100);

        assert_eq!(store.evict(EvictionStrategy::Lru), None);
        assert_eq!(store.evict(EvictionStrategy::Fifo), None);
        assert_eq!(store.evict(EvictionStrategy::Random), None);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_age_and_staleness() {
        let (mut store, clock) = store_with(100);

        store
            .set("v1", json!(1), SetOptions::new().ttl(Duration::from_secs(600)))
            .unwrap();
        store
            .set("v3", json!(3), SetOptions::new().ttl(Duration::from_secs(600)).version(3))
            .unwrap();

        clock.advance(Duration::from_secs(90));

        assert_eq!(store.get_age("v1"), Some(Duration::from_secs(90)));
        assert_eq!(store.get_age("missing"), None);
        assert!(store.is_stale("v1"));
        assert!(!store.is_stale("v3"));
        assert!(store.is_stale("missing"));
    }

    #[test]
    fn test_store_cleanup_records_time() {
        let (mut store, clock) = store_with(100);
        store.set("k", json!(1), SetOptions::new().ttl(Duration::from_secs(1))).unwrap();

        clock.advance(Duration::from_secs(2));

        assert_eq!(store.cleanup(), 1);
        assert_eq!(store.stats().last_cleanup, Some(clock.now_ms()));
    }

    #[test]
    fn test_store_shrinking_capacity_evicts_one_per_insert() {
        let (mut store, _) = store_with(10);
        for i in 0..5 {
            store.set(format!("k{}", i), json!(i), SetOptions::default()).unwrap();
        }

        store.set_max_entries(2).unwrap();
        assert_eq!(store.len(), 5);

        store.set("new", json!(0), SetOptions::default()).unwrap();
        assert_eq!(store.len(), 5);
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_config_setters_validate() {
        let (mut store, _) = store_with(10);

        assert!(store.set_default_ttl(Duration::ZERO).is_err());
        assert!(store.set_max_entries(0).is_err());
        assert!(store.set_cleanup_interval(Duration::ZERO).is_err());

        store.set_default_ttl(Duration::from_secs(1)).unwrap();
        assert_eq!(store.config().default_ttl, Duration::from_secs(1));
    }

    #[test]
    fn test_store_stats_track_size() {
        let (mut store, _) = store_with(100);

        store.set("a", json!("xx"), SetOptions::default()).unwrap();
        store.set("b", json!(12345), SetOptions::default()).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_size_bytes, 4 + 5);
    }
}
