//! Eviction Policy Module
//!
//! Decides which entries leave the cache when it grows past its bound.
//! Evictions surface to callers only as later misses.

use std::fmt;
use std::num::NonZeroUsize;

use crate::cache::LruTracker;

// == Eviction Policy ==
/// Strategy consulted by the cache store on every insert, hit and removal.
pub trait EvictionPolicy: Send + fmt::Debug {
    /// A key was inserted or replaced.
    fn record_insert(&mut self, key: &str);

    /// A key was read.
    fn record_access(&mut self, key: &str);

    /// A key left the cache for any reason.
    fn record_removal(&mut self, key: &str);

    /// Returns the next key to evict while the store holds `len` entries,
    /// or None once the store is within bounds.
    fn next_victim(&mut self, len: usize) -> Option<String>;
}

// == LRU Policy ==
/// Keeps at most `capacity` entries, evicting the least recently used.
#[derive(Debug)]
pub struct LruPolicy {
    capacity: NonZeroUsize,
    order: LruTracker,
}

impl LruPolicy {
    /// Creates an LRU policy. A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            order: LruTracker::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

impl EvictionPolicy for LruPolicy {
    fn record_insert(&mut self, key: &str) {
        self.order.touch(key);
    }

    fn record_access(&mut self, key: &str) {
        self.order.touch(key);
    }

    fn record_removal(&mut self, key: &str) {
        self.order.remove(key);
    }

    fn next_victim(&mut self, len: usize) -> Option<String> {
        if len > self.capacity.get() {
            self.order.pop_oldest()
        } else {
            None
        }
    }
}

// == Unbounded ==
/// Never evicts; entries leave only through expiry or explicit removal.
#[derive(Debug, Default)]
pub struct Unbounded;

impl EvictionPolicy for Unbounded {
    fn record_insert(&mut self, _key: &str) {}

    fn record_access(&mut self, _key: &str) {}

    fn record_removal(&mut self, _key: &str) {}

    fn next_victim(&mut self, _len: usize) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_policy_zero_capacity_is_one() {
        assert_eq!(LruPolicy::new(0).capacity(), 1);
    }

    #[test]
    fn test_lru_policy_within_capacity() {
        let mut policy = LruPolicy::new(2);
        policy.record_insert("a");
        policy.record_insert("b");

        assert_eq!(policy.next_victim(2), None);
    }

    #[test]
    fn test_lru_policy_picks_least_recent() {
        let mut policy = LruPolicy::new(2);
        policy.record_insert("a");
        policy.record_insert("b");
        policy.record_access("a");
        policy.record_insert("c");

        assert_eq!(policy.next_victim(3), Some("b".to_string()));
    }

    #[test]
    fn test_lru_policy_forgets_removed_keys() {
        let mut policy = LruPolicy::new(1);
        policy.record_insert("a");
        policy.record_removal("a");
        policy.record_insert("b");

        assert_eq!(policy.next_victim(1), None);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut policy = Unbounded;
        policy.record_insert("a");
        assert_eq!(policy.next_victim(usize::MAX), None);
    }
}
