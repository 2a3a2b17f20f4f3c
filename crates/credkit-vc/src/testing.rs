//! In-memory DID resolution and credential fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use credkit_core::Timestamp;
use credkit_crypto::Secp256k1KeyPair;
use credkit_did::{DidDocument, DidResolver, ResolverError, VerificationMethodEntry, VerificationMethodResolver};
use credkit_jsonld::StaticDocumentLoader;
use serde_json::json;

use crate::contents::{CredentialContents, Schema, Subject};
use crate::data::CredentialData;
use crate::options::CredentialOptions;

pub(crate) const ISSUER: &str = "did:nda:testnet:0xe71963787f8d5e328cd12b7a78b0d26062e1f31e";
pub(crate) const HOLDER: &str = "did:nda:testnet:0x86977f96a4f0973819d204541b1d9d48424302d9";
pub(crate) const SK_HEX: &str = "e5c9a597b20e13627a3850d38439b61ec9ee7aefd77c7cb6c01dc3866e1db19a";
pub(crate) const OTHER_SK_HEX: &str = "3756330b933a117066e4509ef87b2d82ce10829208ecdd52c9754ddaa1abe746";
pub(crate) const V2: &str = "https://www.w3.org/ns/credentials/v2";
pub(crate) const EXAMPLES_CONTEXT_URL: &str = "https://www.w3.org/ns/credentials/examples/v2";

/// ES256K credential issued by `did:nda:testnet:0x8b3b…`.
pub(crate) const SAMPLE_JWT: &str = "eyJhbGciOiJFUzI1NksiLCJraWQiOiJkaWQ6bmRhOnRlc3RuZXQ6MHg4YjNiMWRlZThlMDBjYjk1ZjhiMmExZDFhOWE3Y2I4ZmU3ZDQ5MGNlI2tleS0xIiwidHlwIjoiSldUIn0.eyJ2YyI6eyJAY29udGV4dCI6WyJodHRwczovL3d3dy53My5vcmcvbnMvY3JlZGVudGlhbHMvdjIiLCJodHRwczovL3d3dy53My5vcmcvbnMvY3JlZGVudGlhbHMvZXhhbXBsZXMvdjIiXSwiY3JlZGVudGlhbFNjaGVtYSI6eyJpZCI6Imh0dHBzOi8vZXhhbXBsZS5vcmcvc2NoZW1hcy9lZHVjYXRpb25hbC1jcmVkZW50aWFsLmpzb24iLCJ0eXBlIjoiSnNvblNjaGVtYSJ9LCJjcmVkZW50aWFsU3RhdHVzIjp7ImlkIjoiaHR0cHM6Ly9leGFtcGxlLm9yZy9jcmVkZW50aWFscy9zdGF0dXMvMTIzIiwic3RhdHVzTGlzdEluZGV4IjoiMTIzIiwic3RhdHVzUHVycG9zZSI6InJldm9jYXRpb24iLCJ0eXBlIjoiQml0c3RyaW5nU3RhdHVzTGlzdEVudHJ5In0sImNyZWRlbnRpYWxTdWJqZWN0Ijp7ImRlZ3JlZSI6IkJhY2hlbG9yIG9mIFNjaWVuY2UiLCJncmFkdWF0aW9uWWVhciI6MjAyMywiaWQiOiJkaWQ6a2V5OnoyZG16RDgxY2dQeDhWa2k3SmJ1dU1tRllyV1BnWW95dHlrVVozZXlxaHQxajlLYnNFWXZkcmp4TWpRNHRwbmplOUJEQlR6dU5EUDNrbm42cUxaRXJ6ZDRiSjVnbzJDQ2hvUGpkNUdBSDN6cEZKUDVmdXdTazY2VTVQcTZFaEY0bktuSHpEbnpuRVA4Zlg5OW5aR2d3YkFoMW83R2oxWDUyVGRoZjdVNEtUazY2eHNBNXIiLCJuYW1lIjoiSm9obiBEb2UiLCJ1bml2ZXJzaXR5IjoiVGVzdCBVbml2ZXJzaXR5In0sImlkIjoidXJuOnV1aWQ6c2lnbmF0dXJlLXRlc3QtY3JlZGVudGlhbC0xMjM0NTY3OCIsImlzc3VlciI6ImRpZDpuZGE6dGVzdG5ldDoweDhiM2IxZGVlOGUwMGNiOTVmOGIyYTFkMWE5YTdjYjhmZTdkNDkwY2UiLCJ0eXBlIjpbIlZlcmlmaWFibGVDcmVkZW50aWFsIiwiRWR1Y2F0aW9uYWxDcmVkZW50aWFsIl0sInZhbGlkRnJvbSI6IjIwMjQtMDEtMDFUMDA6MDA6MDBaIiwidmFsaWRVbnRpbCI6IjIwMjUtMDEtMDFUMDA6MDA6MDBaIn19.aDZAa9pMUFaK5F0LE1S9B-ZL1814OwFaQNKvNr5G-HQTPLPNkIFB0ii9fTeDFMQXUiuEf09oBa7s0k0IHdrP0w";

/// Serves fixed DID documents keyed by DID.
#[derive(Debug, Default)]
pub(crate) struct StaticResolver {
    documents: HashMap<String, DidDocument>,
}

impl StaticResolver {
    /// `ISSUER` publishing the public key of `SK_HEX` as `#key-1`.
    pub(crate) fn issuer() -> Self {
        let public_key = Secp256k1KeyPair::from_hex(SK_HEX).unwrap().public_key().to_hex();
        let document = DidDocument {
            context: json!("https://www.w3.org/ns/did/v1"),
            id: ISSUER.into(),
            verification_method: vec![VerificationMethodEntry {
                id: format!("{ISSUER}#key-1"),
                method_type: "EcdsaSecp256k1VerificationKey2019".into(),
                controller: Some(ISSUER.into()),
                public_key_hex: Some(public_key),
                public_key_jwk: None,
            }],
            authentication: None,
            assertion_method: Some(vec![json!(format!("{ISSUER}#key-1"))]),
        };
        let mut documents = HashMap::new();
        documents.insert(ISSUER.to_string(), document);
        Self { documents }
    }
}

#[async_trait]
impl DidResolver for StaticResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        self.documents.get(did).cloned().ok_or_else(|| ResolverError::Resolution {
            endpoint: format!("memory:{did}"),
            status: 404,
            body: String::new(),
        })
    }
}

pub(crate) fn vm_resolver() -> VerificationMethodResolver<StaticResolver> {
    VerificationMethodResolver::new(StaticResolver::issuer())
}

/// Loader serving only the bundled credentials v2 context.
pub(crate) fn loader() -> StaticDocumentLoader {
    StaticDocumentLoader::new()
}

/// Loader that also serves the credentials examples context.
pub(crate) fn examples_loader() -> StaticDocumentLoader {
    StaticDocumentLoader::new().with_document(
        EXAMPLES_CONTEXT_URL,
        json!({"@context": {"@vocab": "https://www.w3.org/ns/credentials/examples#"}}),
    )
}

/// Options resolving through [`StaticResolver::issuer`].
pub(crate) fn options() -> CredentialOptions {
    CredentialOptions::new().with_resolver(Arc::new(StaticResolver::issuer()))
}

pub(crate) fn contents() -> CredentialContents {
    CredentialContents {
        context: vec![V2.into()],
        id: Some("urn:uuid:f86b96e6-2e22-42d0-8d81-6849c80157b0".into()),
        types: vec!["VerifiableCredential".into()],
        issuer: Some(ISSUER.into()),
        valid_from: Some(Timestamp::parse("2025-01-01T00:00:00Z").unwrap()),
        valid_until: Some(Timestamp::parse("2026-01-01T00:00:00Z").unwrap()),
        subject: vec![Subject::with_id(HOLDER).field("name", "Alice")],
        schemas: vec![Schema::new("https://example.org/schemas/degree.json", "JsonSchema")],
        ..Default::default()
    }
}

pub(crate) fn unsigned_fixture() -> CredentialData {
    CredentialData::from_contents(&contents()).unwrap()
}

pub(crate) async fn signed_fixture() -> CredentialData {
    let mut data = unsigned_fixture();
    data.add_data_integrity_proof(SK_HEX, &format!("{ISSUER}#key-1"), "assertionMethod", &vm_resolver(), &loader())
        .await
        .unwrap();
    data
}
