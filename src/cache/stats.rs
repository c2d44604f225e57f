//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and payload size.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of entries removed by an eviction pass
    pub evictions: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// Sum of the serialized size of every entry, in bytes
    pub total_size_bytes: usize,
    /// Time of the last cleanup pass (Unix milliseconds)
    pub last_cleanup: Option<u64>,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    // == Size Accounting ==
    /// Adjusts entry count and payload size for a newly stored entry.
    pub fn record_insert(&mut self, size: usize) {
        self.total_entries += 1;
        self.total_size_bytes += size;
    }

    /// Adjusts entry count and payload size for a removed entry.
    pub fn record_remove(&mut self, size: usize) {
        self.total_entries = self.total_entries.saturating_sub(1);
        self.total_size_bytes = self.total_size_bytes.saturating_sub(size);
    }

    // == Record Cleanup ==
    pub fn record_cleanup(&mut self, at: u64) {
        self.last_cleanup = Some(at);
    }

    // == Reset ==
    /// Zeroes every counter, as done by `clear`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
