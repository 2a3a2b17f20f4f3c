//! Credential error taxonomy.
//!
//! Engines never report a failed verification as `Ok(false)`; every failure
//! path is one of these variants.

use credkit_core::{CanonicalizationError, CryptoError, EncodingError};
use credkit_did::ResolverError;
use thiserror::Error;

/// Errors from credential construction, signing, and verification.
#[derive(Error, Debug)]
pub enum VcError {
    /// Raw input is empty or not a recognizable credential.
    #[error("parse error: {0}")]
    Parse(String),

    /// The credential body could not be canonicalized.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Malformed key, signature, or hex/base64 material.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The DID document has no usable key for the verification method.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The DID document could not be fetched or decoded.
    #[error("DID resolution failed: {0}")]
    Resolution(ResolverError),

    /// The proof type/cryptosuite combination has no verifier.
    #[error("unsupported proof: {0}")]
    UnsupportedProof(String),

    /// A well-formed proof did not verify.
    #[error("verification failed: {0}")]
    VerificationFailed(String),

    /// A field required for the operation is absent or empty.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Credential contents are structurally invalid.
    #[error("invalid credential contents: {0}")]
    InvalidContents(String),

    /// The requested feature is not available.
    #[error("not implemented: {0}")]
    NotImplemented(String),
}

impl From<ResolverError> for VcError {
    fn from(err: ResolverError) -> Self {
        match err {
            ResolverError::KeyNotFound(msg) => VcError::KeyNotFound(msg),
            ResolverError::Crypto(e) => VcError::Crypto(e),
            other => VcError::Resolution(other),
        }
    }
}

impl From<EncodingError> for VcError {
    fn from(err: EncodingError) -> Self {
        VcError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for VcError {
    fn from(err: serde_json::Error) -> Self {
        VcError::Parse(err.to_string())
    }
}
