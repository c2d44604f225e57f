//! Cache Module
//!
//! In-process cache engine with TTL expiration, tag-based invalidation,
//! pluggable eviction and staleness tracking.

mod clock;
mod config;
mod engine;
mod entry;
mod key;
mod options;
mod pattern;
mod stats;
mod store;
mod tags;


// Re-export public types
pub use clock::{current_timestamp_ms, Clock, MockClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_CLEANUP_INTERVAL, DEFAULT_MAX_ENTRIES, DEFAULT_TTL};
pub use engine::CacheEngine;
pub use entry::{estimate_size, CacheEntry, EntryInfo, STALE_WINDOW_MS};
pub use key::{generate_key, PARAM_SEPARATOR};
pub use options::{EvictionStrategy, SetOptions};
pub use pattern::KeyPattern;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use tags::TagIndex;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;
