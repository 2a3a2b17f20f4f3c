//! # credkit-core — Foundational Types for credkit
//!
//! The leaf of the credkit crate graph. Defines the primitives every other
//! crate builds on:
//!
//! 1. **`CanonicalBytes` newtype.** The byte sequence that gets hashed and
//!    signed for a data-integrity proof. Its inner buffer is private; the
//!    JSON-LD canonicalizer is the only producer of N-Quads in the stack.
//!
//! 2. **`ContentDigest`.** A 32-byte SHA-256 digest with hex rendering.
//!    [`sha256_digest()`] accepts only `&CanonicalBytes`; [`sha256_bytes()`]
//!    exists for the JWS/JWT paths whose signing input is not RDF.
//!
//! 3. **UTC `Timestamp`s with millisecond precision.** Credential dates and
//!    proof `created` values render as `YYYY-MM-DDTHH:MM:SS.fffZ`.
//!
//! 4. **Encodings.** Hex (with optional `0x` prefix) and unpadded base64url,
//!    the two encodings used by keys, signatures, and JWT segments.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credkit-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_bytes, sha256_digest, ContentDigest};
pub use encoding::{base64url_decode, base64url_encode, decode_hex, encode_hex, strip_hex_prefix};
pub use error::{CanonicalizationError, CryptoError, EncodingError};
pub use temporal::Timestamp;
