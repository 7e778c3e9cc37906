//! LRU Tracker Module
//!
//! Tracks recency of cache keys for least-recently-used eviction.

use std::collections::VecDeque;

// == LRU Tracker ==
/// Tracks access order of cache keys.
///
/// Front = most recently used, back = least recently used.
/// A key appears at most once.
#[derive(Debug, Default, Clone)]
pub struct LruTracker {
    order: VecDeque<String>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as most recently used, adding it if unseen.
    pub fn touch(&mut self, key: &str) {
        if self.order.front().map(String::as_str) == Some(key) {
            return;
        }
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Stops tracking a key.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

}

#[cfg(test)]
impl LruTracker {
    fn oldest(&self) -> Option<&str> {
        self.order.back().map(String::as_str)
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn contains(&self, key: &str) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
