//! Date Range Builder
//!
//! Turns a reference date into the inclusive 7-day window the feed is
//! queried with. Day boundaries follow US Eastern time, which is where the
//! upstream feed rolls over to a new entry.

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::error::{FeedError, Result};

// == Constants ==
/// Timezone whose calendar day defines a feed day
pub const FEED_TIMEZONE: Tz = chrono_tz::America::New_York;

/// Wire format of a feed day
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Days between the start and end of a query window
pub const RANGE_SPAN_DAYS: u64 = 6;

// == Date Range ==
/// Inclusive `[start, end]` window with `start = end - 6 days`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// `start_date` query value.
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// `end_date` query value.
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_param(), self.end_param())
    }
}

// == Builders ==
/// Calendar day of an instant in the feed timezone.
pub fn feed_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&FEED_TIMEZONE).date_naive()
}

/// Current feed day.
pub fn today() -> NaiveDate {
    feed_day(Utc::now())
}

/// Builds the query window ending on the feed day that contains `reference`.
///
/// # Errors
/// Returns `InvalidDate` if the start of the window cannot be represented.
pub fn compute_range(reference: DateTime<Utc>) -> Result<DateRange> {
    compute_range_for_day(feed_day(reference))
}

/// Builds the query window ending on `end`.
///
/// # Errors
/// Returns `InvalidDate` if the start of the window cannot be represented.
pub fn compute_range_for_day(end: NaiveDate) -> Result<DateRange> {
    let start = end
        .checked_sub_days(Days::new(RANGE_SPAN_DAYS))
        .ok_or_else(|| {
            FeedError::InvalidDate(format!(
                "cannot subtract {} days from {}",
                RANGE_SPAN_DAYS, end
            ))
        })?;
    Ok(DateRange { start, end })
}

// == Selection Bounds ==
/// First day the feed has an entry for. Bounds date pickers only.
pub fn lower_bound() -> NaiveDate {
    NaiveDate::from_ymd_opt(1995, 6, 22).unwrap_or(NaiveDate::MIN)
}

/// True if `day` lies within `[lower_bound(), today]`.
pub fn is_selectable(day: NaiveDate, today: NaiveDate) -> bool {
    lower_bound() <= day && day <= today
}

/// Parses a `YYYY-MM-DD` feed day.
pub fn parse_day(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|e| FeedError::InvalidDate(format!("'{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_compute_range_known_day() {
        // Midday in New York on 2024-05-27
        let reference = Utc.with_ymd_and_hms(2024, 5, 27, 16, 0, 0).unwrap();
        let range = compute_range(reference).unwrap();

        assert_eq!(range.start_param(), "2024-05-21");
        assert_eq!(range.end_param(), "2024-05-27");
    }

    #[test]
    fn test_feed_day_uses_eastern_time() {
        // 02:00 UTC on the 28th is still the evening of the 27th in New York
        let reference = Utc.with_ymd_and_hms(2024, 5, 28, 2, 0, 0).unwrap();
        assert_eq!(feed_day(reference), day(2024, 5, 27));

        let range = compute_range(reference).unwrap();
        assert_eq!(range.end_param(), "2024-05-27");
    }

    #[test]
    fn test_range_across_year_boundary() {
        let range = compute_range_for_day(day(2024, 1, 3)).unwrap();
        assert_eq!(range.start_param(), "2023-12-28");
        assert_eq!(range.end_param(), "2024-01-03");
    }

    #[test]
    fn test_calendar_year_not_week_year() {
        // 2024-12-30 falls in ISO week 1 of 2025
        let range = compute_range_for_day(day(2024, 12, 30)).unwrap();
        assert_eq!(range.end_param(), "2024-12-30");
    }

    #[test]
    fn test_range_underflow_is_invalid_date() {
        let result = compute_range_for_day(NaiveDate::MIN);
        assert!(matches!(result, Err(FeedError::InvalidDate(_))));
    }

    #[test]
    fn test_range_display() {
        let range = compute_range_for_day(day(2024, 5, 27)).unwrap();
        assert_eq!(range.to_string(), "2024-05-21..=2024-05-27");
    }

    #[test]
    fn test_lower_bound_and_selectable() {
        let today = day(2024, 5, 27);

        assert_eq!(lower_bound(), day(1995, 6, 22));
        assert!(is_selectable(lower_bound(), today));
        assert!(is_selectable(today, today));
        assert!(!is_selectable(day(1995, 6, 21), today));
        assert!(!is_selectable(day(2024, 5, 28), today));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("2024-05-27").unwrap(), day(2024, 5, 27));
        assert!(matches!(parse_day("27/05/2024"), Err(FeedError::InvalidDate(_))));
    }

    proptest! {
        // The window always ends on the reference feed day and spans six days.
        #[test]
        fn prop_range_ends_on_reference_and_spans_six_days(secs in 0i64..4_102_444_800) {
            let reference = Utc.timestamp_opt(secs, 0).unwrap();
            let range = compute_range(reference).unwrap();

            prop_assert_eq!(
                range.end_param(),
                reference.with_timezone(&FEED_TIMEZONE).format(DATE_FORMAT).to_string()
            );
            prop_assert_eq!((range.end - range.start).num_days(), 6);
        }
    }
}
