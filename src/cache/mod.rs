//! Cache Module
//!
//! Provides the in-memory decoded image cache with pluggable eviction
//! and optional age-based expiry.

mod entry;
mod eviction;
mod lru;
mod stats;
mod store;


use std::sync::Arc;

// Re-export public types
pub use entry::CacheEntry;
pub use eviction::{EvictionPolicy, LruPolicy, Unbounded};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::{CacheStore, ImageCache};

/// A decoded image as held by the cache and handed to callers.
pub type DecodedImage = Arc<image::DynamicImage>;

// == Public Constants ==
/// Default number of decoded images kept in memory
pub const DEFAULT_CAPACITY: usize = 64;
