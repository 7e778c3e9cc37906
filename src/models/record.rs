//! Feed record model
//!
//! One day's entry as returned by the remote feed.

use serde::{Deserialize, Deserializer, Serialize};

use crate::assets::Variant;

/// Media type reported for a feed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
    Other(String),
}

/// A single feed entry.
///
/// Every field defaults to an empty string when absent or `null`, so a
/// sparse object still decodes. `date` (`YYYY-MM-DD`) is the natural
/// identifier and seeds the cache key of the record's images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub copyright: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    #[serde(rename = "url", default, deserialize_with = "null_as_empty")]
    pub standard_url: String,
    #[serde(rename = "hdurl", default, deserialize_with = "null_as_empty")]
    pub hd_url: String,
    #[serde(rename = "media_type", default, deserialize_with = "null_as_empty")]
    pub media_type: String,
    #[serde(rename = "service_version", default, deserialize_with = "null_as_empty")]
    pub service_version: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
}

impl FeedRecord {
    /// Returns the asset URL for a variant, or None when the feed left it blank.
    pub fn url_for(&self, variant: Variant) -> Option<&str> {
        let url = match variant {
            Variant::Standard => &self.standard_url,
            Variant::Hd => &self.hd_url,
        };
        if url.is_empty() {
            None
        } else {
            Some(url.as_str())
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        match self.media_type.as_str() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            other => MediaKind::Other(other.to_string()),
        }
    }

    /// True when the record points at a decodable still image.
    pub fn is_image(&self) -> bool {
        self.media_kind() == MediaKind::Image
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
