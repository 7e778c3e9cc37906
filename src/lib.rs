//! APOD Feed - astronomy picture feed client
//!
//! Fetches a week of feed records and resolves their images through an
//! in-memory decoded image cache.

pub mod assets;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod dates;
pub mod error;
pub mod feed;
pub mod models;
pub mod tasks;
pub mod transport;

pub use assets::{key_for, AssetResolver, Variant};
pub use cache::{DecodedImage, ImageCache};
pub use config::Config;
pub use dates::{compute_range, DateRange};
pub use error::{FeedError, Result};
pub use feed::RecordFetcher;
pub use models::FeedRecord;
pub use tasks::spawn_expiry_task;
pub use transport::{HttpTransport, Transport};
