//! # Error Types — Shared Error Hierarchy
//!
//! Errors raised below the credential layer. All use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Canonicalization errors name the offending context or construct.
//! - Cryptographic errors distinguish malformed input (always an error)
//!   from a well-formed signature that does not match (reported as
//!   `Ok(false)` by the verifier, never through this type).

use thiserror::Error;

/// Error during JSON-LD expansion or RDF canonicalization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// A `@context` entry or term definition could not be processed.
    #[error("invalid @context: {0}")]
    InvalidContext(String),

    /// A remote context URL has no registered document.
    #[error("no document registered for context {0}")]
    UnknownContext(String),

    /// The document itself is not valid JSON-LD.
    #[error("invalid JSON-LD document: {0}")]
    InvalidDocument(String),

    /// The expanded document has no RDF dataset form.
    #[error("RDF conversion failed: {0}")]
    RdfConversion(String),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Hex input could not be decoded.
    #[error("invalid hex for {field}: {source}")]
    InvalidHex {
        /// Which input was malformed (`private key`, `signature`, ...).
        field: &'static str,
        /// Underlying decode error.
        source: hex::FromHexError,
    },

    /// Key parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Signature bytes are structurally invalid.
    #[error("signature error: {0}")]
    SignatureError(String),

    /// The signing operation itself failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

/// Error decoding one of the wire encodings.
#[derive(Error, Debug)]
pub enum EncodingError {
    /// Hex decode failure.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Base64url decode failure.
    #[error("invalid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Timestamp string was not a recognised date-time.
    #[error("invalid timestamp {input:?}: {reason}")]
    Timestamp {
        /// The rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },
}
