//! Session configuration.

use std::fmt;
use std::time::Duration;

use super::error::DarwinError;

/// Environment variable consulted when no endpoint is given.
pub const ENDPOINT_ENV: &str = "DARWIN_WEBSERVICE_URL";

/// Environment variable consulted when no access credential is given.
pub const API_KEY_ENV: &str = "DARWIN_WEBSERVICE_API_KEY";

/// Public Darwin LDB REST endpoint on the Rail Data Marketplace.
pub const DEFAULT_ENDPOINT: &str =
    "https://api1.raildata.org.uk/1010-live-departure-board-dep1_2/LDBWS";

/// Default per-call timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Configuration for a Darwin session.
#[derive(Clone)]
pub struct DarwinConfig {
    /// Base URL of the web service
    pub endpoint: String,
    /// Access credential, sent with every request
    pub api_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DarwinConfig {
    /// Create a config from an explicit endpoint and credential.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Resolve endpoint and credential, falling back to [`ENDPOINT_ENV`] and
    /// [`API_KEY_ENV`] for whichever is not given.
    pub fn resolve(endpoint: Option<String>, api_key: Option<String>) -> Result<Self, DarwinError> {
        Self::resolve_with(endpoint, api_key, |name| std::env::var(name).ok())
    }

    /// [`resolve`](Self::resolve) with a custom variable lookup.
    ///
    /// Blank values count as missing.
    pub fn resolve_with(
        endpoint: Option<String>,
        api_key: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, DarwinError> {
        let endpoint = pick(endpoint, ENDPOINT_ENV, &lookup).ok_or_else(|| {
            DarwinError::Configuration(format!(
                "no service endpoint given and {ENDPOINT_ENV} is not set"
            ))
        })?;
        let api_key = pick(api_key, API_KEY_ENV, &lookup).ok_or_else(|| {
            DarwinError::Configuration(format!(
                "no access credential given and {API_KEY_ENV} is not set"
            ))
        })?;

        Ok(Self::new(endpoint, api_key))
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn pick(
    explicit: Option<String>,
    var: &str,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    explicit
        .filter(|v| !v.trim().is_empty())
        .or_else(|| lookup(var).filter(|v| !v.trim().is_empty()))
}

// Keep the credential out of logs.
impl fmt::Debug for DarwinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DarwinConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
