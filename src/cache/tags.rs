//! Tag Index Module
//!
//! Maps each tag to the keys carrying it so group invalidation does not scan the store.

use std::collections::{HashMap, HashSet};

// == Tag Index ==
/// Reverse index from tag to the set of keys labelled with it.
///
/// Tags with no remaining keys are dropped from the index.
#[derive(Debug, Default)]
pub struct TagIndex {
    keys_by_tag: HashMap<String, HashSet<String>>,
}

impl TagIndex {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Insert ==
    /// Records `key` under every tag in `tags`.
    pub fn insert<'a, I>(&mut self, key: &str, tags: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in tags {
            self.keys_by_tag
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
    }

    // == Remove ==
    /// Forgets `key` under every tag in `tags`.
    pub fn remove<'a, I>(&mut self, key: &str, tags: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in tags {
            if let Some(keys) = self.keys_by_tag.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.keys_by_tag.remove(tag);
                }
            }
        }
    }

    // == Keys For Tag ==
    /// Returns the keys labelled with `tag` (empty when unknown).
    pub fn keys_for(&self, tag: &str) -> Vec<String> {
        self.keys_by_tag
            .get(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.keys_by_tag.clear();
    }

    /// Number of distinct tags currently indexed.
    pub fn tag_count(&self) -> usize {
        self.keys_by_tag.len()
    }
}
