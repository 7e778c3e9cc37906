//! Error types for the feed client
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Feed Error Enum ==
/// Unified error type for record fetching and asset resolution.
///
/// Every variant carries owned data only, so a single result can be
/// cloned out to every caller waiting on the same in-flight fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Transport failure, non-success status or empty payload
    #[error("Network error: {0}")]
    Network(String),

    /// Payload is not a record array, or bytes are not an image
    #[error("Decode error: {0}")]
    Decode(String),

    /// The secret lookup yielded no API key
    #[error("API credential unavailable")]
    CredentialUnavailable,

    /// Date arithmetic or parsing failed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Record lacks the date or URL needed to address an asset
    #[error("Incomplete record: {0}")]
    IncompleteRecord(String),

    /// Background task failed before producing a result
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the feed client.
pub type Result<T> = std::result::Result<T, FeedError>;
