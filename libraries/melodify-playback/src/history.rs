//! Recently played window
//!
//! Bounded set of track identifiers that smart shuffle keeps out of the
//! immediate rotation.

use std::collections::VecDeque;

/// Recently played identifiers with FIFO eviction
///
/// Behaves as a set (re-inserting a present identifier is a no-op) but
/// remembers insertion order so the oldest entry is evicted first.
#[derive(Debug, Clone, Default)]
pub struct RecentlyPlayed {
    /// Identifiers, oldest at the front
    ids: VecDeque<String>,
}

impl RecentlyPlayed {
    /// Create an empty window
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an identifier, then evict oldest entries until `bound` holds
    ///
    /// The bound is passed per call because it depends on the queue length.
    pub fn insert(&mut self, id: &str, bound: usize) {
        if !self.contains(id) {
            self.ids.push_back(id.to_string());
        }
        self.trim(bound);
    }

    /// Evict oldest entries until at most `bound` remain
    pub fn trim(&mut self, bound: usize) {
        while self.ids.len() > bound {
            self.ids.pop_front();
        }
    }

    /// Forget everything except `id`, still honoring `bound`
    pub fn reset_to(&mut self, id: &str, bound: usize) {
        self.ids.clear();
        self.ids.push_back(id.to_string());
        self.trim(bound);
    }

    /// Keep only identifiers matching the predicate
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.ids.retain(|id| keep(id));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|entry| entry == id)
    }

    /// Identifiers, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}
