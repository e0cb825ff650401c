//! Explicitly owned compiled-pattern cache

use std::collections::hash_map::Entry;

use ahash::AHashMap;
use regex::{Regex, RegexBuilder};

use crate::error::Result;

/// Compiled-pattern cache with explicit ownership.
///
/// Patterns compile once per instance with case-insensitive and multi-line
/// matching; later lookups reuse the compiled form. There is no eviction:
/// the cache lives exactly as long as whoever owns it.
#[derive(Debug, Default)]
pub struct PatternCache {
    compiled: AHashMap<String, Regex>,
}

impl PatternCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of compiled patterns held.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// True when no patterns have been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    /// Fetch the compiled form of `pattern`, compiling on first use.
    pub fn matcher(&mut self, pattern: &str) -> Result<&Regex> {
        match self.compiled.entry(pattern.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .multi_line(true)
                    .build()?;
                Ok(slot.insert(regex))
            }
        }
    }
}
