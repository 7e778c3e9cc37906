//! Variant key policy
//!
//! Maps a record and a quality variant to the cache slot its image lives in.

use std::fmt;

use crate::models::FeedRecord;

/// Prefix that separates high-definition keys from standard ones.
pub const HD_KEY_PREFIX: &str = "HD";

/// Image quality requested for a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Variant {
    #[default]
    Standard,
    Hd,
}

impl Variant {
    /// Picks the variant for a "show HD" toggle.
    pub fn from_hd_flag(hd: bool) -> Self {
        if hd {
            Variant::Hd
        } else {
            Variant::Standard
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Standard => f.write_str("standard"),
            Variant::Hd => f.write_str("hd"),
        }
    }
}

/// Cache key for a record's image in the given variant.
///
/// Standard images use the date verbatim; HD images prefix it with `"HD"`.
pub fn key_for(record: &FeedRecord, variant: Variant) -> String {
    key_for_date(&record.date, variant)
}

pub fn key_for_date(date: &str, variant: Variant) -> String {
    match variant {
        Variant::Standard => date.to_string(),
        Variant::Hd => format!("{}{}", HD_KEY_PREFIX, date),
    }
}
