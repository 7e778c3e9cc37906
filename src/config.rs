//! Configuration Module
//!
//! Loads client settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use url::Url;

use crate::cache::{CacheStore, ImageCache, LruPolicy, DEFAULT_CAPACITY};
use crate::credentials::{ChainedCredentials, EnvCredential, FileCredential};
use crate::dates::parse_day;
use crate::feed::DEFAULT_BASE_URL;
use crate::transport::DEFAULT_TIMEOUT_SECS;

/// Client configuration parameters.
///
/// Every value can be set through an environment variable; unset or
/// unparsable values fall back to the defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Feed endpoint
    pub base_url: Url,
    /// Environment variable holding the API key
    pub api_key_var: String,
    /// JSON file with an `API_KEY` entry, consulted after the env var
    pub credentials_file: PathBuf,
    /// Maximum number of decoded images kept in memory
    pub cache_capacity: usize,
    /// Max age of a cached image, None = no expiry
    pub cache_ttl: Option<Duration>,
    /// Interval between expiry sweeps
    pub sweep_interval: Duration,
    /// Transport request timeout
    pub request_timeout: Duration,
    /// Reference day for the query window, None = today
    pub end_date: Option<NaiveDate>,
}

impl Config {
    /// Creates a Config from environment variables.
    ///
    /// # Environment Variables
    /// - `APOD_BASE_URL` - Feed endpoint (default: public APOD endpoint)
    /// - `APOD_API_KEY_VAR` - Name of the API key variable (default: APOD_API_KEY)
    /// - `APOD_CREDENTIALS_FILE` - Credentials JSON file (default: AppData.json)
    /// - `APOD_CACHE_CAPACITY` - Cached image limit (default: 64)
    /// - `APOD_CACHE_TTL` - Cached image max age in seconds, 0 = none (default: 0)
    /// - `APOD_SWEEP_INTERVAL` - Expiry sweep interval in seconds (default: 60)
    /// - `APOD_REQUEST_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `APOD_END_DATE` - Reference day as YYYY-MM-DD (default: today)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            base_url: env::var("APOD_BASE_URL")
                .ok()
                .and_then(|v| Url::parse(&v).ok())
                .unwrap_or(defaults.base_url),
            api_key_var: env::var("APOD_API_KEY_VAR").unwrap_or(defaults.api_key_var),
            credentials_file: env::var("APOD_CREDENTIALS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.credentials_file),
            cache_capacity: parse_var("APOD_CACHE_CAPACITY")
                .filter(|capacity: &usize| *capacity > 0)
                .unwrap_or(defaults.cache_capacity),
            cache_ttl: match parse_var::<u64>("APOD_CACHE_TTL") {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(secs)),
                None => defaults.cache_ttl,
            },
            sweep_interval: parse_var("APOD_SWEEP_INTERVAL")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            request_timeout: parse_var("APOD_REQUEST_TIMEOUT")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            end_date: env::var("APOD_END_DATE")
                .ok()
                .and_then(|v| parse_day(&v).ok()),
        }
    }

    /// Builds the image cache described by this configuration.
    pub fn build_cache(&self) -> ImageCache {
        ImageCache::new(CacheStore::new(
            Box::new(LruPolicy::new(self.cache_capacity)),
            self.cache_ttl,
        ))
    }

    /// Builds the credential lookup: env var first, then the credentials file.
    pub fn build_credentials(&self) -> ChainedCredentials {
        ChainedCredentials::new()
            .with(EnvCredential::new(self.api_key_var.clone()))
            .with(FileCredential::new(self.credentials_file.clone()))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key_var: "APOD_API_KEY".to_string(),
            credentials_file: PathBuf::from("AppData.json"),
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl: None,
            sweep_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            end_date: None,
        }
    }
}
