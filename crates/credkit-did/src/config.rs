//! DID resolver configuration.
//!
//! Defaults point to the public NDA DID resolver. Override via environment
//! variables or explicit construction for staging/testing.

use url::Url;

/// Default DID resolver endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.ndadid.vn/api/v1/did";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the HTTP DID resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Base URL, validated as an absolute URL on construction. Documents
    /// are fetched from `{base_url}/{urlencoded did}`.
    base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ResolverConfig {
    /// Configuration with the given base URL and the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_url("base_url", base_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `CREDKIT_DID_BASE_URL` (default: `https://api.ndadid.vn/api/v1/did`)
    /// - `CREDKIT_DID_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("CREDKIT_DID_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            base_url: validate_url("CREDKIT_DID_BASE_URL", &raw)?,
            timeout_secs: std::env::var("CREDKIT_DID_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn validate_url(source: &str, raw: &str) -> Result<String, ConfigError> {
    Url::parse(raw)
        .map(|_| raw.to_string())
        .map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
