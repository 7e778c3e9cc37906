//! Feed data models
//!
//! Types decoded from the remote feed's JSON payload.

pub mod record;

pub use record::{FeedRecord, MediaKind};
