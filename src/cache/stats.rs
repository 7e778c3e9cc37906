//! Cache Statistics Module
//!
//! Tracks cache effectiveness: hits, misses, writes, evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing how the image cache has been used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups served from memory
    pub hits: u64,
    /// Lookups that found nothing, or only an expired entry
    pub misses: u64,
    /// Stores, including overwrites of an existing key
    pub writes: u64,
    /// Entries dropped by the eviction policy
    pub evictions: u64,
    /// Entries dropped because they outlived their max age
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
