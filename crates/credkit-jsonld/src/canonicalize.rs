//! # Canonicalizer — JSON-LD Document to Canonical N-Quads
//!
//! Composes the pipeline: JSON-LD expansion against the loader's contexts,
//! conversion to lexical RDF quads, and RDFC-1.0 labeling. The output is
//! the [`CanonicalBytes`] that a data-integrity proof hashes and signs.
//!
//! ## Security Invariant
//!
//! Two documents that differ only in key order, blank node labels, or the
//! order of multi-valued properties yield identical bytes. Anything that
//! does not map to an absolute IRI (terms with no definition and no
//! `@vocab`) produces no quads and therefore is **not** covered by the
//! signature.

use credkit_core::{sha256_digest, CanonicalBytes, CanonicalizationError, ContentDigest};
use futures::executor::block_on;
use json_ld::{JsonLdProcessor, RemoteDocument};
use rdf_types::{generator, LexicalQuad};
use serde_json::{Map, Value};
use ssi_rdf::urdna2015;

use crate::loader::{DocumentLoader, ProcessorLoader, StaticDocumentLoader};

/// JSON-LD canonicalizer parameterized by its context loader.
#[derive(Debug, Clone)]
pub struct Canonicalizer<L = StaticDocumentLoader> {
    loader: L,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Canonicalizer {
    /// Canonicalizer serving only the bundled credentials v2 context.
    pub fn new() -> Self {
        Self::with_loader(StaticDocumentLoader::new())
    }
}

impl<L: DocumentLoader> Canonicalizer<L> {
    pub fn with_loader(loader: L) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// RDF dataset of `document` with document-local blank node labels.
    ///
    /// The loader is synchronous, so the expansion future never waits and
    /// is driven to completion in place.
    pub fn to_rdf(&self, document: &Value) -> Result<Vec<LexicalQuad>, CanonicalizationError> {
        let loader = ProcessorLoader::new(&self.loader);
        let input: RemoteDocument = RemoteDocument::new(None, None, json_syntax::Value::from(document.clone()));

        let expanded = block_on(input.expand(&loader)).map_err(|e| {
            loader
                .take_failure()
                .unwrap_or_else(|| CanonicalizationError::InvalidDocument(e.to_string()))
        })?;

        match linked_data::to_lexical_quads(generator::Blank::new(), &expanded) {
            Ok(quads) => Ok(quads),
            Err(_) => Err(CanonicalizationError::RdfConversion(
                "expanded document has no RDF dataset form".into(),
            )),
        }
    }

    /// Canonical N-Quads of `document`.
    pub fn canonicalize(&self, document: &Value) -> Result<CanonicalBytes, CanonicalizationError> {
        if !document.is_object() && !document.is_array() {
            return Err(CanonicalizationError::InvalidDocument(
                "document must be a JSON object or array".into(),
            ));
        }
        let quads = self.to_rdf(document)?;
        let nquads = urdna2015::normalize(quads.iter().map(|quad| quad.as_lexical_quad_ref())).into_nquads();
        let canonical = CanonicalBytes::from_nquads(nquads);
        tracing::debug!(
            quads = canonical.quad_count(),
            bytes = canonical.len(),
            "canonicalized JSON-LD document"
        );
        Ok(canonical)
    }

    /// Canonical N-Quads of `document` with its top-level `proof` removed.
    /// The caller's map is left untouched.
    pub fn canonicalize_without_proof(
        &self,
        document: &Map<String, Value>,
    ) -> Result<CanonicalBytes, CanonicalizationError> {
        let mut unsigned = document.clone();
        unsigned.remove("proof");
        self.canonicalize(&Value::Object(unsigned))
    }
}

/// [`Canonicalizer::canonicalize_without_proof`] with the default loader.
pub fn canonicalize_without_proof(
    document: &Map<String, Value>,
) -> Result<CanonicalBytes, CanonicalizationError> {
    Canonicalizer::new().canonicalize_without_proof(document)
}

/// SHA-256 of canonical bytes; the message a data-integrity proof signs.
pub fn digest(canonical: &CanonicalBytes) -> ContentDigest {
    sha256_digest(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    const CRED_ID: &str = "urn:uuid:f86b96e6-2e22-42d0-8d81-6849c80157b0";
    const HOLDER: &str = "did:nda:testnet:0x86977f96a4f0973819d204541b1d9d48424302d9";
    const ISSUER: &str = "did:nda:testnet:0xe71963787f8d5e328cd12b7a78b0d26062e1f31e";

    fn sample_credential() -> Value {
        json!({
            "validFrom": "2025-12-01T02:25:20Z",
            "id": CRED_ID,
            "validUntil": "2025-12-02T02:25:20Z",
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "type": "VerifiableCredential",
            "credentialSubject": {
                "issuer": ISSUER,
                "citizenIdentify": "024537894514",
                "result": "matched",
                "id": HOLDER,
                "issuedBy": "Mobifone",
                "issuedDate": "2025-12-01",
                "phoneNumber": "0761804353"
            },
            "proof": {
                "proofPurpose": "assertionMethod",
                "created": "2025-12-01T02:25:21Z",
                "proofValue": "a7a970560732bf2e2cb4a02b4a566e12adc658e57aac871f1399c2d4532f2d0037186ae3173990a3d98dec31e518e03efb1e7ea438d919babc9974356def26d000",
                "type": "DataIntegrityProof",
                "cryptosuite": "ecdsa-rdfc-2019",
                "verificationMethod": format!("{ISSUER}#key-1")
            },
            "issuer": ISSUER
        })
    }

    fn expected_nquads() -> String {
        let cred = "https://www.w3.org/2018/credentials#";
        [
            format!("<{CRED_ID}> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <{cred}VerifiableCredential> .\n"),
            format!("<{CRED_ID}> <{cred}credentialSubject> <{HOLDER}> .\n"),
            format!("<{CRED_ID}> <{cred}issuer> <{ISSUER}> .\n"),
            format!("<{CRED_ID}> <{cred}validFrom> \"2025-12-01T02:25:20Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime> .\n"),
            format!("<{CRED_ID}> <{cred}validUntil> \"2025-12-02T02:25:20Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime> .\n"),
        ]
        .concat()
    }

    fn vocab_document(value: Value) -> Value {
        json!({"@context": {"@vocab": "https://e.org/"}, "@id": "urn:a", "n": value})
    }

    #[test]
    fn credential_without_proof_matches_known_nquads() {
        let doc = sample_credential();
        let canonical = canonicalize_without_proof(doc.as_object().unwrap()).unwrap();
        assert_eq!(canonical.as_str(), expected_nquads());
        assert_eq!(canonical.quad_count(), 5);
    }

    #[test]
    fn canonicalize_without_proof_leaves_input_untouched() {
        let doc = sample_credential();
        let map = doc.as_object().unwrap();
        canonicalize_without_proof(map).unwrap();
        assert!(map.contains_key("proof"));
    }

    #[test]
    fn minimal_credential_yields_three_quads() {
        let doc = json!({
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "id": "urn:uuid:X",
            "type": ["VerifiableCredential"],
            "issuer": "did:example:Y",
            "validFrom": "2025-01-01T00:00:00Z"
        });
        let canonical = Canonicalizer::new().canonicalize(&doc).unwrap();
        let cred = "https://www.w3.org/2018/credentials#";
        let expected = [
            format!("<urn:uuid:X> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <{cred}VerifiableCredential> .\n"),
            format!("<urn:uuid:X> <{cred}issuer> <did:example:Y> .\n"),
            format!("<urn:uuid:X> <{cred}validFrom> \"2025-01-01T00:00:00Z\"^^<http://www.w3.org/2001/XMLSchema#dateTime> .\n"),
        ]
        .concat();
        assert_eq!(canonical.as_str(), expected);
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = json!({
            "@context": ["https://www.w3.org/ns/credentials/v2"],
            "id": "urn:uuid:X",
            "type": "VerifiableCredential",
            "issuer": "did:example:Y",
            "validUntil": "2026-01-01T00:00:00Z"
        });
        let b = json!({
            "validUntil": "2026-01-01T00:00:00Z",
            "issuer": "did:example:Y",
            "type": "VerifiableCredential",
            "id": "urn:uuid:X",
            "@context": ["https://www.w3.org/ns/credentials/v2"]
        });
        let c = Canonicalizer::new();
        assert_eq!(c.canonicalize(&a).unwrap(), c.canonicalize(&b).unwrap());
    }

    #[test]
    fn anonymous_subject_order_does_not_matter() {
        let subjects = |first: &str, second: &str| {
            json!({
                "@context": {"@vocab": "https://e.org/"},
                "@id": "urn:uuid:X",
                "subject": [{"name": first}, {"name": second}]
            })
        };
        let c = Canonicalizer::new();
        let a = c.canonicalize(&subjects("alice", "bob")).unwrap();
        let b = c.canonicalize(&subjects("bob", "alice")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.quad_count(), 4);
        assert!(a.as_str().contains("_:c14n0"));
        assert!(a.as_str().contains("_:c14n1"));
    }

    #[test]
    fn blank_node_labels_do_not_matter() {
        let cycle = |x: &str, y: &str| {
            json!({
                "@context": {"@vocab": "https://e.org/"},
                "@graph": [
                    {"@id": x, "knows": {"@id": y}},
                    {"@id": y, "knows": {"@id": x}}
                ]
            })
        };
        let c = Canonicalizer::new();
        let a = c.canonicalize(&cycle("_:x", "_:y")).unwrap();
        let b = c.canonicalize(&cycle("_:y", "_:x")).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a.as_str(),
            "_:c14n0 <https://e.org/knows> _:c14n1 .\n_:c14n1 <https://e.org/knows> _:c14n0 .\n"
        );
    }

    #[test]
    fn nearby_doubles_stay_distinct() {
        let c = Canonicalizer::new();
        let a = c.canonicalize(&vocab_document(json!(0.30000000000000004))).unwrap();
        let b = c.canonicalize(&vocab_document(json!(0.3))).unwrap();
        assert_ne!(a, b);
        assert!(a.as_str().contains("http://www.w3.org/2001/XMLSchema#double"));
    }

    #[test]
    fn integers_are_typed_integers() {
        let canonical = Canonicalizer::new().canonicalize(&vocab_document(json!(2023))).unwrap();
        assert_eq!(
            canonical.as_str(),
            "<urn:a> <https://e.org/n> \"2023\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n"
        );
    }

    #[test]
    fn unknown_remote_context_fails() {
        let doc = json!({"@context": "https://example.org/unknown", "name": "x"});
        let err = Canonicalizer::new().canonicalize(&doc).unwrap_err();
        assert!(matches!(err, CanonicalizationError::UnknownContext(url) if url == "https://example.org/unknown"));
    }

    #[test]
    fn registered_context_is_used() {
        let loader = StaticDocumentLoader::new().with_document(
            "https://example.org/ctx",
            json!({"@context": {"name": "https://schema.org/name"}}),
        );
        let doc = json!({"@context": "https://example.org/ctx", "@id": "urn:a", "name": "x"});
        let canonical = Canonicalizer::with_loader(loader).canonicalize(&doc).unwrap();
        assert_eq!(canonical.as_str(), "<urn:a> <https://schema.org/name> \"x\" .\n");
    }

    #[test]
    fn shared_loader_serves_registered_contexts() {
        let loader = StaticDocumentLoader::new()
            .with_document(
                "https://example.org/ctx",
                json!({"@context": {"name": "https://schema.org/name"}}),
            )
            .shared();
        let doc = json!({
            "@context": ["https://www.w3.org/ns/credentials/v2", "https://example.org/ctx"],
            "id": "urn:a",
            "name": "x"
        });
        let canonical = Canonicalizer::with_loader(loader).canonicalize(&doc).unwrap();
        assert!(canonical.as_str().contains("<urn:a> <https://schema.org/name> \"x\" .\n"));
    }

    #[test]
    fn scalar_document_is_rejected() {
        let err = Canonicalizer::new().canonicalize(&json!("text")).unwrap_err();
        assert!(matches!(err, CanonicalizationError::InvalidDocument(_)));
    }

    #[test]
    fn digest_is_sha256_of_nquads() {
        let canonical = Canonicalizer::new().canonicalize(&sample_credential()).unwrap();
        assert_eq!(
            digest(&canonical),
            credkit_core::sha256_bytes(canonical.as_bytes())
        );
    }

    proptest! {
        #[test]
        fn issuer_value_appears_in_quads(suffix in "[a-z0-9]{1,16}") {
            let issuer = format!("did:example:{suffix}");
            let doc = json!({
                "@context": ["https://www.w3.org/ns/credentials/v2"],
                "id": "urn:uuid:X",
                "type": "VerifiableCredential",
                "issuer": issuer
            });
            let canonical = Canonicalizer::new().canonicalize(&doc).unwrap();
            let expected = format!("<https://www.w3.org/2018/credentials#issuer> <{}> .\n", issuer);
            prop_assert!(canonical.as_str().contains(&expected));
        }
    }
}
