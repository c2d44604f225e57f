//! Request DTOs for the cache admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::cache::{EvictionStrategy, KeyPattern, SetOptions};
use crate::error::Result;

/// Request body for the SET operation (PUT /entries)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl_ms`: Optional TTL in milliseconds (uses default if not specified)
/// - `tags`: Optional invalidation tags
/// - `version`: Optional staleness scale
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
    /// Tags for group invalidation
    #[serde(default)]
    pub tags: Vec<String>,
    /// Staleness scale
    #[serde(default)]
    pub version: Option<u32>,
}

impl SetRequest {
    /// Splits the request into key, value and write options.
    pub fn into_parts(self) -> (String, Value, SetOptions) {
        let options = SetOptions {
            ttl: self.ttl_ms.map(Duration::from_millis),
            tags: self.tags,
            version: self.version,
        };
        (self.key, self.value, options)
    }
}

/// Request body for POST /invalidate
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Substring, or regular expression when `regex` is set
    pub pattern: String,
    #[serde(default)]
    pub regex: bool,
}

impl InvalidateRequest {
    pub fn to_pattern(&self) -> Result<KeyPattern> {
        if self.regex {
            KeyPattern::regex(&self.pattern)
        } else {
            Ok(KeyPattern::literal(self.pattern.as_str()))
        }
    }
}

/// Request body for POST /evict; no strategy means the configured one
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvictRequest {
    #[serde(default)]
    pub strategy: Option<EvictionStrategy>,
}
