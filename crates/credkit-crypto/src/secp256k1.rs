//! # secp256k1 Keys and Signatures
//!
//! Typed wrappers over `k256` for the keys and signatures credentials carry.
//!
//! ## Security Invariant
//!
//! - `Secp256k1KeyPair` does not implement `Serialize` and its `Debug`
//!   output never includes the private scalar.
//! - Public keys accept both SEC1 encodings (33-byte compressed with a
//!   `02`/`03` prefix, 65-byte uncompressed with `04`) and are compared in
//!   uncompressed form, so the same point always compares equal.
//! - Signatures are low-S normalized before verification. Signatures
//!   produced here are already low-S.
//!
//! ## Serde
//!
//! - Public keys serialize as uncompressed lowercase hex.
//! - Signatures serialize as 65-byte `r || s || v` lowercase hex.

use credkit_core::{strip_hex_prefix, CryptoError};
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Size of the ECDSA message representative for a 256-bit curve order.
pub const MESSAGE_REPRESENTATIVE_LEN: usize = 32;

/// The recovery byte appended by [`Secp256k1Signature::to_bytes()`].
///
/// Recovery id computation is not performed; the byte is always zero and the
/// resulting signatures cannot be used for public-key recovery.
pub const RECOVERY_BYTE: u8 = 0;

/// A secp256k1 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Secp256k1PublicKey(VerifyingKey);

/// A secp256k1 ECDSA signature, stored as `r || s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1Signature([u8; 64]);

/// A secp256k1 private key together with its public point.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

// ---------------------------------------------------------------------------
// Secp256k1PublicKey impls
// ---------------------------------------------------------------------------

impl Secp256k1PublicKey {
    /// Parse a SEC1-encoded point (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            33 if matches!(bytes[0], 0x02 | 0x03) => {}
            65 if bytes[0] == 0x04 => {}
            n => {
                return Err(CryptoError::KeyError(format!(
                    "public key must be 33-byte compressed or 65-byte uncompressed SEC1, got {n} bytes"
                )))
            }
        }
        VerifyingKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|e| CryptoError::KeyError(format!("invalid secp256k1 point: {e}")))
    }

    /// Parse a hex-encoded SEC1 point, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex_field("public key", hex)?;
        Self::from_sec1_bytes(&bytes)
    }

    /// The 65-byte uncompressed SEC1 encoding.
    pub fn to_uncompressed(&self) -> Vec<u8> {
        self.0.to_encoded_point(false).as_bytes().to_vec()
    }

    /// The 33-byte compressed SEC1 encoding.
    pub fn to_compressed(&self) -> Vec<u8> {
        self.0.to_encoded_point(true).as_bytes().to_vec()
    }

    /// Uncompressed SEC1 as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_uncompressed())
    }

    /// Compressed SEC1 as lowercase hex.
    pub fn to_compressed_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Verify a signature over `message` (see [`message_representative`]).
    ///
    /// Returns `false` for a well-formed signature that does not match.
    pub fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> Result<bool, CryptoError> {
        let sig = Signature::from_slice(&signature.0)
            .map_err(|e| CryptoError::SignatureError(format!("invalid r/s scalars: {e}")))?;
        let sig = sig.normalize_s().unwrap_or(sig);
        let prehash = message_representative(message);
        Ok(self.0.verify_prehash(&prehash, &sig).is_ok())
    }
}

impl Serialize for Secp256k1PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secp256k1PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1PublicKey({})", self.to_compressed_hex())
    }
}

impl std::fmt::Display for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Secp256k1Signature impls
// ---------------------------------------------------------------------------

impl Secp256k1Signature {
    /// From the 64-byte compact `r || s` form.
    pub fn from_compact(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Accept 64-byte `r || s` or 65-byte `r || s || v`. The recovery byte is
    /// dropped, not interpreted.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 64 && bytes.len() != 65 {
            return Err(CryptoError::SignatureError(format!(
                "signature must be 64 or 65 bytes, got {}",
                bytes.len()
            )));
        }
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&bytes[..64]);
        Ok(Self(rs))
    }

    /// Parse a hex signature of 64 or 65 bytes.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex_field("signature", hex)?;
        Self::from_slice(&bytes)
    }

    /// The compact `r || s` form used in JWT signatures.
    pub fn to_compact(&self) -> [u8; 64] {
        self.0
    }

    /// The 65-byte `r || s || v` form, with `v` fixed at [`RECOVERY_BYTE`].
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[..64].copy_from_slice(&self.0);
        out[64] = RECOVERY_BYTE;
        out
    }

    /// The 65-byte form as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Serialize for Secp256k1Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Secp256k1Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Secp256k1Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1Signature({}...)", hex::encode(&self.0[..4]))
    }
}

// ---------------------------------------------------------------------------
// Secp256k1KeyPair impls
// ---------------------------------------------------------------------------

impl Secp256k1KeyPair {
    /// Load a private scalar from big-endian bytes. Inputs shorter than 32
    /// bytes are treated as integers and left-padded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.is_empty() || bytes.len() > 32 {
            return Err(CryptoError::KeyError(format!(
                "private key must be 1 to 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut scalar = [0u8; 32];
        scalar[32 - bytes.len()..].copy_from_slice(bytes);
        let signing_key = SigningKey::from_slice(&scalar)
            .map_err(|e| CryptoError::KeyError(format!("invalid secp256k1 private key: {e}")))?;
        Ok(Self { signing_key })
    }

    /// Load a hex private key, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = decode_hex_field("private key", hex)?;
        Self::from_bytes(&bytes)
    }

    /// The public point for this private key.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey(*self.signing_key.verifying_key())
    }

    /// Sign `message` (see [`message_representative`]). Deterministic
    /// (RFC 6979) and low-S.
    pub fn sign(&self, message: &[u8]) -> Result<Secp256k1Signature, CryptoError> {
        let prehash = message_representative(message);
        let sig: Signature = self
            .signing_key
            .sign_prehash(&prehash)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let mut rs = [0u8; 64];
        rs.copy_from_slice(&sig.to_bytes());
        Ok(Secp256k1Signature(rs))
    }
}

impl std::fmt::Debug for Secp256k1KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1KeyPair(<private>, {:?})", self.public_key())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map message bytes onto the 32-byte ECDSA message representative.
///
/// The bytes are read as a big-endian integer: shorter inputs are left-padded
/// with zeros, longer inputs keep their leading 256 bits.
pub fn message_representative(message: &[u8]) -> [u8; MESSAGE_REPRESENTATIVE_LEN] {
    let mut out = [0u8; MESSAGE_REPRESENTATIVE_LEN];
    if message.len() >= MESSAGE_REPRESENTATIVE_LEN {
        out.copy_from_slice(&message[..MESSAGE_REPRESENTATIVE_LEN]);
    } else {
        out[MESSAGE_REPRESENTATIVE_LEN - message.len()..].copy_from_slice(message);
    }
    out
}

pub(crate) fn decode_hex_field(field: &'static str, s: &str) -> Result<Vec<u8>, CryptoError> {
    hex::decode(strip_hex_prefix(s.trim())).map_err(|source| CryptoError::InvalidHex { field, source })
}
