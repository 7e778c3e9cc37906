//! Asset resolver
//!
//! Resolves a `(source URL, cache key)` pair to a decoded image:
//! Lookup, then on a miss Fetch, Decode, Store and Return.
//!
//! Concurrent misses for the same key share one spawned fetch. The fetch
//! task runs to completion even if every caller stops waiting, and it
//! stores its image before unregistering itself, so a resolve that arrives
//! afterwards sees a cache hit.

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::assets::{key_for, Variant};
use crate::cache::{DecodedImage, ImageCache};
use crate::error::{FeedError, Result};
use crate::models::FeedRecord;
use crate::transport::Transport;

type PendingResolve = Shared<BoxFuture<'static, Result<DecodedImage>>>;

/// Lookup-or-fetch resolver for record images.
#[derive(Clone)]
pub struct AssetResolver {
    cache: ImageCache,
    transport: Arc<dyn Transport>,
    in_flight: Arc<Mutex<HashMap<String, PendingResolve>>>,
}

impl AssetResolver {
    pub fn new(cache: ImageCache, transport: Arc<dyn Transport>) -> Self {
        Self {
            cache,
            transport,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    /// Number of fetches currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Returns the image cached under `key`, fetching it from `source_url`
    /// on a miss.
    ///
    /// A hit performs no I/O. A failed fetch or decode stores nothing, and
    /// nothing is retried.
    ///
    /// # Errors
    /// - `Network` if the transport fails or returns an empty payload
    /// - `Decode` if the bytes are not an image
    pub async fn resolve(&self, source_url: &str, key: &str) -> Result<DecodedImage> {
        if let Some(image) = self.cache.get(key) {
            trace!(key, "Asset cache hit");
            return Ok(image);
        }

        let pending = {
            let mut in_flight = self.in_flight.lock();

            // A fetch may have landed between the lookup and taking the lock
            if let Some(image) = self.cache.peek(key) {
                trace!(key, "Asset stored while waiting");
                return Ok(image);
            }

            match in_flight.get(key) {
                Some(pending) => {
                    debug!(key, "Joining in-flight asset fetch");
                    pending.clone()
                }
                None => {
                    debug!(key, url = source_url, "Asset cache miss, fetching");
                    let pending = self.spawn_fetch(source_url.to_string(), key.to_string());
                    in_flight.insert(key.to_string(), pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Resolves a record's image in the requested variant.
    ///
    /// Each variant has its own cache slot, so switching variants triggers an
    /// independent resolve rather than reusing the other variant's image.
    ///
    /// # Errors
    /// `IncompleteRecord` if the record has no date or no URL for `variant`,
    /// otherwise as [`AssetResolver::resolve`].
    pub async fn resolve_record(
        &self,
        record: &FeedRecord,
        variant: Variant,
    ) -> Result<DecodedImage> {
        if record.date.is_empty() {
            return Err(FeedError::IncompleteRecord(
                "record has no date to key its image".to_string(),
            ));
        }
        let url = record.url_for(variant).ok_or_else(|| {
            FeedError::IncompleteRecord(format!("no {} url for {}", variant, record.date))
        })?;

        self.resolve(url, &key_for(record, variant)).await
    }

    /// Resolves the standard image shown on a record's preview card.
    pub async fn resolve_preview(&self, record: &FeedRecord) -> Result<DecodedImage> {
        self.resolve_record(record, Variant::Standard).await
    }

    fn spawn_fetch(&self, url: String, key: String) -> PendingResolve {
        let transport = self.transport.clone();
        let cache = self.cache.clone();
        let in_flight = self.in_flight.clone();

        let task = tokio::spawn(async move {
            // A panicking transport must still unregister the key
            let result = AssertUnwindSafe(fetch_and_decode(transport.as_ref(), &url))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(FeedError::Internal(format!("fetch of {url} panicked"))));

            let mut in_flight = in_flight.lock();
            match &result {
                Ok(image) => cache.set(key.clone(), image.clone()),
                Err(e) => warn!(key = %key, url = %url, error = %e, "Asset resolve failed"),
            }
            in_flight.remove(&key);
            result
        });

        async move {
            task.await
                .unwrap_or_else(|e| Err(FeedError::Internal(format!("resolve task failed: {e}"))))
        }
        .boxed()
        .shared()
    }
}

/// Fetches `url` and decodes the body off the async executor.
async fn fetch_and_decode(transport: &dyn Transport, url: &str) -> Result<DecodedImage> {
    let bytes = transport.get_bytes(url).await?;
    if bytes.is_empty() {
        return Err(FeedError::Network("Response carried no payload".to_string()));
    }

    let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| FeedError::Decode(format!("Decode task panicked: {e}")))?
        .map_err(|e| FeedError::Decode(format!("Failed to decode image: {e}")))?;

    Ok(Arc::new(decoded))
}
