//! HTTP transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::{FeedError, Result};
use crate::transport::Transport;

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// [`Transport`] that performs real HTTP GETs.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport whose requests give up after `timeout`.
    ///
    /// # Errors
    /// Returns `Network` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FeedError::Network(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FeedError::Network(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Network(format!(
                "HTTP {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FeedError::Network(format!("Failed to read body: {e}")))?;

        if body.is_empty() {
            return Err(FeedError::Network("Response carried no payload".to_string()));
        }

        debug!(bytes = body.len(), "Received response body");
        Ok(body)
    }
}

