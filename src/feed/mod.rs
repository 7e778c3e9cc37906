//! Feed Module
//!
//! Fetches the records for a date window from the remote feed.

mod fetcher;

pub use fetcher::{RecordFetcher, DEFAULT_BASE_URL};
