//! Key Pattern Module
//!
//! Matching rules for coarse-grained invalidation by key.

use regex::Regex;

use crate::error::{CacheError, Result};

// == Key Pattern ==
/// Selects keys for `invalidate`: a literal substring or a regular expression.
#[derive(Debug, Clone)]
pub enum KeyPattern {
    /// Matches keys containing the substring
    Literal(String),
    /// Matches keys the expression finds a match in
    Regex(Regex),
}

impl KeyPattern {
    // == Constructors ==
    pub fn literal(pattern: impl Into<String>) -> Self {
        KeyPattern::Literal(pattern.into())
    }

    /// Compiles a regular expression pattern.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(KeyPattern::Regex)
            .map_err(|e| CacheError::InvalidPattern(e.to_string()))
    }

    // == Matches ==
    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Literal(needle) => key.contains(needle.as_str()),
            KeyPattern::Regex(re) => re.is_match(key),
        }
    }
}

impl From<&str> for KeyPattern {
    fn from(pattern: &str) -> Self {
        KeyPattern::literal(pattern)
    }
}

impl From<String> for KeyPattern {
    fn from(pattern: String) -> Self {
        KeyPattern::Literal(pattern)
    }
}

impl From<Regex> for KeyPattern {
    fn from(re: Regex) -> Self {
        KeyPattern::Regex(re)
    }
}
