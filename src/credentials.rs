//! Credential lookup
//!
//! Sources for the feed API key. A lookup yields the key or nothing;
//! [`require_credential`] turns nothing into `CredentialUnavailable`.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{FeedError, Result};

/// Default key name inside a credentials file
pub const DEFAULT_KEY_NAME: &str = "API_KEY";

/// Supplies the feed API key.
pub trait CredentialSource: Send + Sync {
    /// Returns the key, or None if this source has none.
    fn credential(&self) -> Option<String>;
}

/// Looks the key up and fails with `CredentialUnavailable` when absent.
pub fn require_credential(source: &dyn CredentialSource) -> Result<String> {
    match source.credential() {
        Some(key) => Ok(key),
        None => {
            warn!("No API credential available; feed fetch aborted");
            Err(FeedError::CredentialUnavailable)
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// == Static ==
/// A fixed key, or a fixed absence.
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    pub fn absent() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone().and_then(non_blank)
    }
}

// == Environment ==
/// Reads the key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn credential(&self) -> Option<String> {
        env::var(&self.var).ok().and_then(non_blank)
    }
}

// == File ==
/// Reads the key from a JSON object file such as `{"API_KEY": "..."}`.
///
/// Read and parse failures are logged and reported as absence.
#[derive(Debug, Clone)]
pub struct FileCredential {
    path: PathBuf,
    key_name: String,
}

impl FileCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key_name(path, DEFAULT_KEY_NAME)
    }

    pub fn with_key_name(path: impl Into<PathBuf>, key_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key_name: key_name.into(),
        }
    }
}

impl CredentialSource for FileCredential {
    fn credential(&self) -> Option<String> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error reading credentials file");
                return None;
            }
        };

        let entries: HashMap<String, serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Error parsing credentials file");
                return None;
            }
        };

        match entries.get(&self.key_name) {
            Some(serde_json::Value::String(key)) => non_blank(key.clone()),
            _ => {
                warn!(
                    path = %self.path.display(),
                    key = %self.key_name,
                    "Credentials file has no string entry for key"
                );
                None
            }
        }
    }
}

// == Chain ==
/// Tries each source in order and returns the first key found.
#[derive(Default)]
pub struct ChainedCredentials {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl ChainedCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl CredentialSource for ChainedCredentials {
    fn credential(&self) -> Option<String> {
        self.sources.iter().find_map(|source| source.credential())
    }
}
