//! # credkit-jsonld — JSON-LD Canonicalization
//!
//! Turns a JSON-LD credential into the canonical N-Quads that an
//! `ecdsa-rdfc-2019` data-integrity proof signs. Expansion is done by the
//! `json-ld` processor, RDF conversion by `linked-data`, and blank node
//! labeling by the RDFC-1.0 (URDNA2015) implementation in `ssi-rdf`.
//!
//! Start with [`Canonicalizer`], or [`canonicalize_without_proof()`] for the
//! common case of hashing a credential before adding its proof.
//!
//! ## Crate Policy
//!
//! - No network access. Remote contexts come from a [`DocumentLoader`]; the
//!   default loader knows only the bundled credentials v2 context.
//! - Loaders are synchronous, so canonicalization is synchronous too.
//! - A loader failure is returned as the loader reported it.

pub mod canonicalize;
pub mod loader;

pub use canonicalize::{canonicalize_without_proof, digest, Canonicalizer};
pub use loader::{DocumentLoader, SharedDocumentLoader, StaticDocumentLoader, CREDENTIALS_V2_URL};
