//! Cache Entry Module
//!
//! Defines a single cached image together with its expiry metadata.

use std::time::{Duration, Instant};

use crate::cache::DecodedImage;

// == Cache Entry ==
/// Represents a single decoded image held by the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The decoded image
    pub image: DecodedImage,
    /// When the entry was stored
    pub stored_at: Instant,
    /// When the entry stops being served, None = no expiry
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry with an optional maximum age.
    ///
    /// # Arguments
    /// * `image` - The decoded image to store
    /// * `max_age` - Optional lifetime of the entry
    pub fn new(image: DecodedImage, max_age: Option<Duration>) -> Self {
        let now = Instant::now();
        Self {
            image,
            stored_at: now,
            expires_at: max_age.map(|age| now + age),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiry instant,
    /// so a zero max age is expired immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Checks expiry against a caller-supplied instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread::sleep;

    fn sample_image() -> DecodedImage {
        Arc::new(image::DynamicImage::new_rgb8(1, 1))
    }

    #[test]
    fn test_entry_creation_no_expiry() {
        let entry = CacheEntry::new(sample_image(), None);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_creation_with_max_age() {
        let entry = CacheEntry::new(sample_image(), Some(Duration::from_secs(60)));

        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(sample_image(), Some(Duration::from_millis(50)));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(sample_image(), Some(Duration::ZERO));
        assert!(entry.is_expired(), "Zero max age expires at once");
    }

    #[test]
    fn test_is_expired_at() {
        let entry = CacheEntry::new(sample_image(), Some(Duration::from_secs(10)));
        let later = entry.stored_at + Duration::from_secs(11);

        assert!(!entry.is_expired_at(entry.stored_at));
        assert!(entry.is_expired_at(later));
    }
}
