//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with a pluggable eviction
//! policy and optional age-based expiry, plus the shared handle used by
//! the asset resolver.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{
    CacheEntry, CacheStats, DecodedImage, EvictionPolicy, LruPolicy, Unbounded, DEFAULT_CAPACITY,
};

// == Cache Store ==
/// Single-threaded image store. Wrap it in [`ImageCache`] to share it.
#[derive(Debug)]
pub struct CacheStore {
    /// Key to decoded image
    entries: HashMap<String, CacheEntry>,
    /// Eviction strategy
    policy: Box<dyn EvictionPolicy>,
    /// Usage counters
    stats: CacheStats,
    /// Lifetime applied to new entries, None = keep until evicted
    max_age: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store with the given eviction policy and optional max age.
    pub fn new(policy: Box<dyn EvictionPolicy>, max_age: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            stats: CacheStats::new(),
            max_age,
        }
    }

    /// Creates an LRU-bounded store without expiry.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Box::new(LruPolicy::new(capacity)), None)
    }

    /// Creates a store that never evicts.
    pub fn unbounded() -> Self {
        Self::new(Box::new(Unbounded), None)
    }

    // == Set ==
    /// Stores an image under `key`, replacing any previous entry.
    ///
    /// Afterwards the eviction policy is asked for victims until the store
    /// is back within bounds. The key just written is never its own victim.
    pub fn set(&mut self, key: String, image: DecodedImage) {
        let entry = CacheEntry::new(image, self.max_age);
        self.entries.insert(key.clone(), entry);
        self.policy.record_insert(&key);
        self.stats.record_write();

        while let Some(victim) = self.policy.next_victim(self.entries.len()) {
            if victim == key {
                self.policy.record_insert(&key);
                break;
            }
            if self.entries.remove(&victim).is_some() {
                debug!(key = %victim, "Evicted cached image");
                self.stats.record_eviction();
            }
        }

        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves the image stored under `key`.
    ///
    /// Expired entries are dropped and reported as misses.
    pub fn get(&mut self, key: &str) -> Option<DecodedImage> {
        let image = match self.entries.get(key) {
            Some(entry) if !entry.is_expired() => entry.image.clone(),
            Some(_) => {
                self.drop_entry(key);
                self.stats.record_expirations(1);
                self.stats.record_miss();
                return None;
            }
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        self.policy.record_access(key);
        self.stats.record_hit();
        Some(image)
    }

    // == Peek ==
    /// Returns a live entry without touching recency or counters.
    pub fn peek(&self, key: &str) -> Option<DecodedImage> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.image.clone())
    }

    // == Remove ==
    /// Removes an entry. Returns true if one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.drop_entry(key)
    }

    // == Sweep Expired ==
    /// Removes every expired entry and returns how many were dropped.
    pub fn sweep_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.drop_entry(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    /// Returns a snapshot of the usage counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn drop_entry(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.policy.record_removal(key);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }
}

// == Image Cache ==
/// Shared, thread-safe handle to a [`CacheStore`].
///
/// Cloning is cheap and every clone addresses the same entries. Operations
/// never suspend, so they can be called from any task or thread.
#[derive(Debug, Clone)]
pub struct ImageCache {
    store: Arc<Mutex<CacheStore>>,
}

impl ImageCache {
    pub fn new(store: CacheStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Creates an LRU cache holding at most `capacity` images.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(CacheStore::with_capacity(capacity))
    }

    pub fn get(&self, key: &str) -> Option<DecodedImage> {
        self.store.lock().get(key)
    }

    pub fn peek(&self, key: &str) -> Option<DecodedImage> {
        self.store.lock().peek(key)
    }

    pub fn set(&self, key: impl Into<String>, image: DecodedImage) {
        self.store.lock().set(key.into(), image);
    }

    pub fn remove(&self, key: &str) -> bool {
        self.store.lock().remove(key)
    }

    pub fn sweep_expired(&self) -> usize {
        self.store.lock().sweep_expired()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.store.lock().contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
