//! Record fetcher
//!
//! Builds the feed query for a date window, issues one GET and decodes the
//! record array. The feed lists a window oldest-first; callers receive it
//! newest-first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use url::Url;

use crate::credentials::{require_credential, CredentialSource};
use crate::dates::{compute_range, DateRange};
use crate::error::{FeedError, Result};
use crate::models::FeedRecord;
use crate::transport::{decode_json_array, Transport};

/// Public feed endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Fetches feed records for a date window.
#[derive(Clone)]
pub struct RecordFetcher {
    base_url: Url,
    credentials: Arc<dyn CredentialSource>,
    transport: Arc<dyn Transport>,
}

impl RecordFetcher {
    pub fn new(
        base_url: Url,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            base_url,
            credentials,
            transport,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `<base>?api_key=..&start_date=..&end_date=..`.
    pub fn request_url(&self, range: &DateRange, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("start_date", &range.start_param())
            .append_pair("end_date", &range.end_param());
        url
    }

    /// Fetches the records dated within `range`, newest first.
    ///
    /// # Errors
    /// - `CredentialUnavailable` if no API key is configured; nothing is sent
    /// - `Network` if the transport fails or returns no payload
    /// - `Decode` if the payload is not an array of records
    pub async fn fetch_records(&self, range: &DateRange) -> Result<Vec<FeedRecord>> {
        let api_key = require_credential(self.credentials.as_ref())?;
        let url = self.request_url(range, &api_key);

        debug!(range = %range, endpoint = %self.base_url, "Fetching feed records");
        let payload = self.transport.get_bytes(url.as_str()).await?;
        if payload.is_empty() {
            return Err(FeedError::Network("Feed response carried no payload".to_string()));
        }

        let mut records: Vec<FeedRecord> = decode_json_array(&payload)?;
        records.reverse();

        info!(range = %range, count = records.len(), "Fetched feed records");
        Ok(records)
    }

    /// Fetches the 7-day window ending on the feed day of `reference`.
    pub async fn fetch_week(&self, reference: DateTime<Utc>) -> Result<Vec<FeedRecord>> {
        let range = compute_range(reference)?;
        self.fetch_records(&range).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredential;
    use crate::dates::compute_range_for_day;
    use crate::transport::mock::MockTransport;
    use chrono::{NaiveDate, TimeZone};
    use proptest::prelude::*;

    fn week_ending(y: i32, m: u32, d: u32) -> DateRange {
        compute_range_for_day(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    fn fetcher(
        transport: Arc<MockTransport>,
        credentials: StaticCredential,
    ) -> RecordFetcher {
        RecordFetcher::new(
            Url::parse(DEFAULT_BASE_URL).unwrap(),
            Arc::new(credentials),
            transport,
        )
    }

    const EXPECTED_URL: &str = "https://api.nasa.gov/planetary/apod?api_key=DEMO_KEY&start_date=2024-05-21&end_date=2024-05-27";

    fn ascending_payload(days: &[&str]) -> String {
        let records: Vec<String> = days
            .iter()
            .map(|d| format!(r#"{{"date":"{}","media_type":"image","url":"https://img/{}.jpg"}}"#, d, d))
            .collect();
        format!("[{}]", records.join(","))
    }

    #[test]
    fn test_request_url_shape() {
        let fetcher = fetcher(Arc::new(MockTransport::new()), StaticCredential::new("DEMO_KEY"));
        let url = fetcher.request_url(&week_ending(2024, 5, 27), "DEMO_KEY");
        assert_eq!(url.as_str(), EXPECTED_URL);
    }

    #[tokio::test]
    async fn test_fetch_records_newest_first() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            EXPECTED_URL,
            ascending_payload(&["2024-05-21", "2024-05-22", "2024-05-27"]),
        );
        let fetcher = fetcher(transport.clone(), StaticCredential::new("DEMO_KEY"));

        let records = fetcher.fetch_records(&week_ending(2024, 5, 27)).await.unwrap();

        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-05-27", "2024-05-22", "2024-05-21"]);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_week_uses_reference_day() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(EXPECTED_URL, "[]");
        let fetcher = fetcher(transport.clone(), StaticCredential::new("DEMO_KEY"));

        let reference = Utc.with_ymd_and_hms(2024, 5, 27, 16, 0, 0).unwrap();
        let records = fetcher.fetch_week(reference).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(transport.requested(), vec![EXPECTED_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let fetcher = fetcher(transport.clone(), StaticCredential::absent());

        let result = fetcher.fetch_records(&week_ending(2024, 5, 27)).await;

        assert_eq!(result, Err(FeedError::CredentialUnavailable));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_network_failure_propagates() {
        let transport = Arc::new(MockTransport::new());
        transport.fail(EXPECTED_URL, FeedError::Network("connection reset".to_string()));
        let fetcher = fetcher(transport, StaticCredential::new("DEMO_KEY"));

        let result = fetcher.fetch_records(&week_ending(2024, 5, 27)).await;
        assert!(matches!(result, Err(FeedError::Network(_))));
    }

    #[tokio::test]
    async fn test_empty_payload_is_network_error() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(EXPECTED_URL, Vec::<u8>::new());
        let fetcher = fetcher(transport.clone(), StaticCredential::new("DEMO_KEY"));

        let result = fetcher.fetch_records(&week_ending(2024, 5, 27)).await;

        assert!(matches!(result, Err(FeedError::Network(_))));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_array_payload_is_decode_error() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(EXPECTED_URL, r#"{"code": 403, "msg": "API_KEY_INVALID"}"#);
        let fetcher = fetcher(transport, StaticCredential::new("DEMO_KEY"));

        let result = fetcher.fetch_records(&week_ending(2024, 5, 27)).await;
        assert!(matches!(result, Err(FeedError::Decode(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        // Ascending feed dates come back strictly descending.
        #[test]
        fn prop_records_descend(offsets in prop::collection::btree_set(0u64..7, 1..6)) {
            let range = week_ending(2024, 5, 27);
            let days: Vec<String> = offsets
                .iter()
                .map(|o| (range.start + chrono::Days::new(*o)).format("%Y-%m-%d").to_string())
                .collect();
            let day_refs: Vec<&str> = days.iter().map(String::as_str).collect();

            let transport = Arc::new(MockTransport::new());
            transport.respond(EXPECTED_URL, ascending_payload(&day_refs));
            let fetcher = fetcher(transport, StaticCredential::new("DEMO_KEY"));

            let records = tokio_test::block_on(fetcher.fetch_records(&range)).unwrap();

            prop_assert_eq!(records.len(), days.len());
            for pair in records.windows(2) {
                prop_assert!(pair[0].date > pair[1].date);
            }
        }
    }
}
