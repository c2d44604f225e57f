//! Cache Options Module
//!
//! Per-write options and the eviction strategy selector.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

// == Set Options ==
/// Optional settings for a single `set`.
///
/// Missing fields fall back to the engine defaults: the configured TTL, no tags,
/// and version 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Time to live; `None` uses the store's default TTL
    pub ttl: Option<Duration>,
    /// Labels for group invalidation
    pub tags: Vec<String>,
    /// Staleness scale; `None` means 1
    pub version: Option<u32>,
}

impl SetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }
}

// == Eviction Strategy ==
/// How `evict` picks its victim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionStrategy {
    /// Oldest write timestamp (reads do not refresh it)
    #[default]
    Lru,
    /// First inserted key in map order
    Fifo,
    /// Uniformly random key
    Random,
}

impl fmt::Display for EvictionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvictionStrategy::Lru => "lru",
            EvictionStrategy::Fifo => "fifo",
            EvictionStrategy::Random => "random",
        };
        f.write_str(name)
    }
}

impl FromStr for EvictionStrategy {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lru" => Ok(EvictionStrategy::Lru),
            "fifo" => Ok(EvictionStrategy::Fifo),
            "random" => Ok(EvictionStrategy::Random),
            other => Err(CacheError::InvalidOptions(format!(
                "Unknown eviction strategy '{}'",
                other
            ))),
        }
    }
}
