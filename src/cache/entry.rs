//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL, tags and versioning.

use std::collections::HashSet;

use serde::Serialize;

// == Constants ==
/// Staleness window granted per version step (one minute)
pub const STALE_WINDOW_MS: u64 = 60_000;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The key this entry is stored under
    pub key: String,
    /// The stored value
    pub data: T,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Expiration timestamp (Unix milliseconds), always >= `timestamp`
    pub expires_at: u64,
    /// Labels for group invalidation
    pub tags: HashSet<String>,
    /// Staleness scale, at least 1
    pub version: u32,
    /// Serialized length of `data` in bytes
    pub size: usize,
}

impl<T: Serialize> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new cache entry written at `now` living for `ttl_ms`.
    ///
    /// # Arguments
    /// * `key` - The key the entry is stored under
    /// * `data` - The value to store
    /// * `now` - Write time in Unix milliseconds
    /// * `ttl_ms` - Time to live in milliseconds
    /// * `tags` - Group invalidation labels
    /// * `version` - Staleness scale
    pub fn new(
        key: String,
        data: T,
        now: u64,
        ttl_ms: u64,
        tags: HashSet<String>,
        version: u32,
    ) -> Self {
        let size = estimate_size(&data);
        Self {
            key,
            data,
            timestamp: now,
            expires_at: now.saturating_add(ttl_ms),
            tags,
            version,
            size,
        }
    }
}

impl<T> CacheEntry<T> {
    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is still valid at exactly `expires_at` and
    /// expires on the first millisecond after it.
    pub fn is_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }

    // == Age ==
    /// Milliseconds elapsed since the entry was written.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Time To Live ==
    /// Remaining TTL in milliseconds, 0 once expired.
    pub fn ttl_remaining_ms(&self, now: u64) -> u64 {
        self.expires_at.saturating_sub(now)
    }

    // == Staleness ==
    /// Age after which the entry is flagged stale: `version` minutes.
    pub fn stale_after_ms(&self) -> u64 {
        u64::from(self.version).saturating_mul(STALE_WINDOW_MS)
    }

    /// True once the entry is older than its staleness window.
    pub fn is_stale_at(&self, now: u64) -> bool {
        self.age_ms(now) > self.stale_after_ms()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    // == Info ==
    /// Metadata snapshot of the entry as seen at `now`.
    pub fn info(&self, now: u64) -> EntryInfo {
        let mut tags: Vec<String> = self.tags.iter().cloned().collect();
        tags.sort();

        EntryInfo {
            key: self.key.clone(),
            age_ms: self.age_ms(now),
            ttl_remaining_ms: self.ttl_remaining_ms(now),
            expires_at: self.expires_at,
            stale: self.is_stale_at(now),
            tags,
            version: self.version,
            size_bytes: self.size,
        }
    }
}

// == Entry Info ==
/// Read-only view of an entry's metadata, without its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryInfo {
    pub key: String,
    pub age_ms: u64,
    pub ttl_remaining_ms: u64,
    pub expires_at: u64,
    pub stale: bool,
    /// Tags in sorted order
    pub tags: Vec<String>,
    pub version: u32,
    pub size_bytes: usize,
}

// == Utility Functions ==
/// Approximate payload size: the length of the value's JSON encoding.
///
/// Values that fail to serialize count as 0 bytes.
pub fn estimate_size<T: Serialize>(data: &T) -> usize {
    serde_json::to_string(data).map(|s| s.len()).unwrap_or(0)
}
