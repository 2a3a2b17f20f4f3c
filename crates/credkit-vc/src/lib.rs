//! # credkit-vc — Verifiable Credential Issue and Verify
//!
//! Two encodings of a W3C Verifiable Credential behind one [`Credential`]
//! trait:
//!
//! - [`JsonCredential`]: JSON-LD with an embedded `DataIntegrityProof`
//!   (`ecdsa-rdfc-2019`) over the RDFC-1.0 canonical form.
//! - [`JwtCredential`]: compact JWS, `ES256K`, credential in the `vc` claim.
//!
//! [`parse_credential`] detects the encoding of raw input. Embedded proofs
//! are dispatched by type and cryptosuite in [`proof`].
//!
//! ## Crate Policy
//!
//! - Signing and verifying resolve keys through the issuer's DID document.
//!   [`CredentialOptions::with_resolver`] injects any [`credkit_did::DidResolver`];
//!   otherwise keys come over HTTP from [`CredentialOptions::did_base_url`].
//! - `@context` URLs other than the credentials v2 context are served by a
//!   [`credkit_jsonld::DocumentLoader`] injected with
//!   [`CredentialOptions::with_document_loader`]. Nothing is fetched.
//! - Verification either succeeds or returns a [`VcError`]. There is no
//!   `Ok(false)`.
//! - A failed `add_proof` leaves the credential unchanged.

pub mod contents;
pub mod credential;
pub mod data;
pub mod error;
pub mod json_credential;
pub mod jwt_credential;
pub mod options;
pub mod proof;

#[cfg(test)]
mod testing;

pub use contents::{validate_context, ContextEntry, CredentialContents, Schema, Status, Subject};
pub use credential::{
    is_jwt, parse_credential, parse_credential_with_validation, AnyCredential, Credential, CredentialFormat,
};
pub use data::CredentialData;
pub use error::VcError;
pub use json_credential::JsonCredential;
pub use jwt_credential::{JwtCredential, ES256K};
pub use options::{CredentialOptions, DEFAULT_VERIFICATION_METHOD_KEY};
pub use proof::{Proof, ProofKind, ProofType, ASSERTION_METHOD, ECDSA_RDFC_2019};
