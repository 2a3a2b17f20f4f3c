//! # credkit-did — DID Resolution and Verification-Method Keys
//!
//! Resolves the public key a credential proof must verify against:
//!
//! - [`DidResolver`] fetches a [`DidDocument`]; [`HttpDidResolver`] does so
//!   over `GET {base_url}/{urlencoded did}`.
//! - [`VerificationMethodResolver`] picks the verification method (exact
//!   `did#fragment` match, or the first entry for a bare DID) and
//!   normalizes its key to hex.
//!
//! ## Crate Policy
//!
//! - The DID fetch is the only I/O in credkit. It is async and never cached
//!   here; a caching resolver is a [`DidResolver`] decorator supplied by the
//!   caller.
//! - Any non-2xx response is an error, never an empty document.

pub mod config;
pub mod document;
pub mod error;
pub mod resolver;
pub mod verification_method;

pub use config::{ConfigError, ResolverConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use document::{DidDocument, Jwk, VerificationMethodEntry};
pub use error::ResolverError;
pub use resolver::{DidResolver, HttpDidResolver};
pub use verification_method::{did_of, VerificationMethodResolver};
