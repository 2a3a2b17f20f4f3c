//! # credkit-crypto — secp256k1 Signature Primitive
//!
//! Every credential proof in credkit is a secp256k1 ECDSA signature. This
//! crate provides:
//!
//! - **Typed keys and signatures** ([`Secp256k1KeyPair`],
//!   [`Secp256k1PublicKey`], [`Secp256k1Signature`]) that never expose
//!   private scalars through `Debug` or `Serialize`.
//! - **Hex-level operations** ([`sign`], [`sign_jwt`], [`verify`],
//!   [`verify_key_pair`]) matching the wire encodings credentials carry.
//!
//! ## Message Handling
//!
//! The primitive signs the bytes it is given; it does not hash them. Callers
//! choose the message per proof suite (canonical digest, SHA-256 of JWS
//! input, or raw JSON). The bytes are mapped onto the 256-bit ECDSA message
//! representative: shorter inputs are left-padded with zeros, longer inputs
//! contribute their leading 32 bytes.
//!
//! ## Crate Policy
//!
//! - Depends only on `credkit-core` internally.
//! - No mocking of cryptographic operations in tests.
//! - Structurally invalid input is a [`CryptoError`]; a well-formed
//!   signature that does not match is `Ok(false)`.

pub mod ecdsa;
pub mod secp256k1;

pub use credkit_core::CryptoError;
pub use ecdsa::{sign, sign_jwt, verify, verify_key_pair};
pub use secp256k1::{message_representative, Secp256k1KeyPair, Secp256k1PublicKey, Secp256k1Signature, RECOVERY_BYTE};
