//! Expiry Sweep Task
//!
//! Background task that periodically removes expired images from the cache.
//! Lookups already treat expired entries as misses; the sweep releases
//! their memory without waiting for a lookup.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ImageCache;

/// Spawns a task that sweeps expired entries every `interval`.
///
/// The task loops until aborted through the returned handle.
///
/// # Example
/// ```ignore
/// let cache = ImageCache::new(CacheStore::new(Box::new(LruPolicy::new(64)), Some(ttl)));
/// let sweep = spawn_expiry_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_expiry_task(cache: ImageCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting cache expiry sweep");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.sweep_expired();
            if removed > 0 {
                info!(removed, remaining = cache.len(), "Expiry sweep removed cached images");
            } else {
                debug!("Expiry sweep found nothing to remove");
            }
        }
    })
}
