//! Hex-level signing and verification.
//!
//! Credentials carry keys and signatures as hex (or base64url for JWTs);
//! these functions take those encodings directly and return the encodings
//! credentials store.

use credkit_core::{base64url_encode, CryptoError};

use crate::secp256k1::{Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature};

/// Sign `message` and return the 65-byte `r || s || v` signature.
///
/// `v` is always zero.
pub fn sign(message: &[u8], private_key_hex: &str) -> Result<[u8; 65], CryptoError> {
    let kp = Secp256k1KeyPair::from_hex(private_key_hex)?;
    Ok(kp.sign(message)?.to_bytes())
}

/// Sign `message` and return base64url(`r || s`), the JWS/JWT signature
/// segment for `ES256K`.
pub fn sign_jwt(message: &[u8], private_key_hex: &str) -> Result<String, CryptoError> {
    let kp = Secp256k1KeyPair::from_hex(private_key_hex)?;
    Ok(base64url_encode(kp.sign(message)?.to_compact()))
}

/// Verify a hex signature (64 or 65 bytes) over `message` against a hex
/// SEC1 public key (compressed or uncompressed).
///
/// # Errors
///
/// Malformed hex, a bad signature length, invalid scalars, or a point that
/// is not on the curve. A well-formed signature that does not match
/// returns `Ok(false)`.
pub fn verify(public_key_hex: &str, signature_hex: &str, message: &[u8]) -> Result<bool, CryptoError> {
    let pk = Secp256k1PublicKey::from_hex(public_key_hex)?;
    let sig = Secp256k1Signature::from_hex(signature_hex)?;
    pk.verify(message, &sig)
}

/// Check whether `public_key_hex` is the point derived from
/// `private_key_hex`, in either SEC1 encoding.
pub fn verify_key_pair(private_key_hex: &str, public_key_hex: &str) -> Result<bool, CryptoError> {
    let kp = Secp256k1KeyPair::from_hex(private_key_hex)?;
    let pk = Secp256k1PublicKey::from_hex(public_key_hex)?;
    Ok(kp.public_key().to_uncompressed() == pk.to_uncompressed())
}
