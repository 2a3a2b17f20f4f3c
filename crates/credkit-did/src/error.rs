//! Resolver error types.

use credkit_core::CryptoError;

use crate::config::ConfigError;

/// Errors from DID resolution and verification-method key extraction.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The resolver returned a non-2xx status.
    #[error("DID resolver {endpoint} returned {status}: {body}")]
    Resolution {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The response body was not a DID document.
    #[error("failed to deserialize DID document from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// No verification method (or no key material) for the requested id.
    #[error("key not found: {0}")]
    KeyNotFound(String),
    /// Key material present but not a secp256k1 key we can use.
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),
    /// The verification method reference could not be split into a DID.
    #[error("invalid verification method: {0}")]
    InvalidVerificationMethod(String),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Key-pair comparison failed on malformed key material.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
