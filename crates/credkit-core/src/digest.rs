//! # Content Digest — SHA-256 over Signing Input
//!
//! Every proof in credkit signs either a 32-byte SHA-256 digest or (for the
//! legacy `proofValue` suite) raw JSON bytes. This module owns the digest
//! side.
//!
//! ## Security Invariant
//!
//! [`sha256_digest()`] accepts only `&CanonicalBytes`. The data-integrity
//! path therefore cannot hash anything but canonical N-Quads. JWS and JWT
//! signing inputs are `header.payload` strings, which are already
//! deterministic, and go through [`sha256_bytes()`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; 32]);

impl ContentDigest {
    /// Wrap raw digest bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for ContentDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute the SHA-256 digest of canonical N-Quads.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    sha256_bytes(data.as_bytes())
}

/// Compute the SHA-256 digest of an arbitrary byte string.
///
/// Used for JWS/JWT signing input, which is not RDF.
pub fn sha256_bytes(data: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(data);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest(bytes)
}
