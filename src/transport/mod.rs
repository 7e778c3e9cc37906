//! Transport Module
//!
//! The "fetch bytes for a URL" capability the core depends on, its
//! reqwest-backed implementation, and JSON array decoding.

mod http;

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{FeedError, Result};

pub use http::{HttpTransport, DEFAULT_TIMEOUT_SECS};

/// Issues GET requests on behalf of the fetcher and resolver.
///
/// Implementations must be thread-safe and must report an empty body as a
/// `Network` error, never as an empty success.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the raw response body for `url`.
    async fn get_bytes(&self, url: &str) -> Result<Bytes>;
}

/// Decodes a JSON array payload into its elements, in payload order.
pub fn decode_json_array<T: DeserializeOwned>(payload: &[u8]) -> Result<Vec<T>> {
    serde_json::from_slice(payload).map_err(|e| FeedError::Decode(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_array() {
        let values: Vec<u32> = decode_json_array(b"[3, 1, 2]").unwrap();
        assert_eq!(values, vec![3, 1, 2]);
    }

    #[test]
    fn test_decode_json_array_rejects_object() {
        let result: Result<Vec<u32>> = decode_json_array(br#"{"error": "bad key"}"#);
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }
}
