//! Tagged Cache - an in-process cache engine
//!
//! Keyed store with TTL expiry, tag-based group invalidation, pluggable eviction,
//! staleness tracking and hit/miss statistics, plus an admin HTTP surface for the
//! owning process.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
mod tasks;

pub use api::AppState;
pub use cache::{CacheConfig, CacheEngine, EvictionStrategy, KeyPattern, SetOptions};
pub use config::Config;
pub use error::{CacheError, Result};
