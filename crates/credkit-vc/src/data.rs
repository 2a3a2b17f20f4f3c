//! # Credential Data
//!
//! [`CredentialData`] is the ordered JSON map form of a credential: what
//! JSON-LD credentials carry on the wire and what JWT credentials carry in
//! their `vc` claim. Insertion order is kept for round-trips; it does not
//! affect the canonical digest.

use credkit_core::{encode_hex, CanonicalBytes, ContentDigest};
use credkit_crypto::sign;
use credkit_did::{DidResolver, VerificationMethodResolver};
use credkit_jsonld::{digest, Canonicalizer, DocumentLoader, StaticDocumentLoader};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contents::CredentialContents;
use crate::error::VcError;
use crate::proof::{Proof, ProofKind};

/// A credential as an ordered JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialData(Map<String, Value>);

impl From<Map<String, Value>> for CredentialData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl CredentialData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_contents(contents: &CredentialContents) -> Result<Self, VcError> {
        Ok(Self(contents.to_map()?))
    }

    /// Parse raw JSON. The top level must be an object.
    pub fn from_slice(raw: &[u8]) -> Result<Self, VcError> {
        if raw.is_empty() {
            return Err(VcError::Parse("credential JSON is empty".into()));
        }
        match serde_json::from_slice::<Value>(raw)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(VcError::Parse("credential JSON must be an object".into())),
        }
    }

    pub fn to_contents(&self) -> Result<CredentialContents, VcError> {
        CredentialContents::from_map(&self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The `issuer` member when it is a non-empty string.
    pub fn issuer(&self) -> Option<&str> {
        self.0.get("issuer").and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn has_proof(&self) -> bool {
        self.0.get("proof").is_some_and(|p| !p.is_null())
    }

    /// The embedded proof; the first element when `proof` is an array.
    pub fn proof(&self) -> Result<Proof, VcError> {
        match self.0.get("proof") {
            Some(value) if !value.is_null() => Proof::from_value(value),
            _ => Err(VcError::MissingField("proof".into())),
        }
    }

    /// Replace the embedded proof.
    pub fn set_proof(&mut self, proof: &Proof) -> Result<(), VcError> {
        let value = proof.to_value()?;
        self.0.insert("proof".into(), value);
        Ok(())
    }

    /// Compact JSON of the whole document.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, VcError> {
        Ok(serde_json::to_vec(&self.0)?)
    }

    /// Compact JSON of the document without `proof`, in document order.
    pub fn to_json_bytes_without_proof(&self) -> Result<Vec<u8>, VcError> {
        let mut unsigned = self.0.clone();
        unsigned.remove("proof");
        Ok(serde_json::to_vec(&unsigned)?)
    }

    /// Canonical N-Quads of the document without `proof`, with only the
    /// bundled credentials v2 context available.
    pub fn canonical_bytes(&self) -> Result<CanonicalBytes, VcError> {
        self.canonical_bytes_with(&StaticDocumentLoader::new())
    }

    /// Canonical N-Quads of the document without `proof`, resolving
    /// `@context` URLs through `loader`.
    pub fn canonical_bytes_with<L: DocumentLoader + ?Sized>(&self, loader: &L) -> Result<CanonicalBytes, VcError> {
        Ok(Canonicalizer::with_loader(loader).canonicalize_without_proof(&self.0)?)
    }

    /// SHA-256 of [`canonical_bytes`](Self::canonical_bytes).
    pub fn canonical_digest(&self) -> Result<ContentDigest, VcError> {
        self.canonical_digest_with(&StaticDocumentLoader::new())
    }

    pub fn canonical_digest_with<L: DocumentLoader + ?Sized>(&self, loader: &L) -> Result<ContentDigest, VcError> {
        Ok(digest(&self.canonical_bytes_with(loader)?))
    }

    /// Check the members a schema-bound credential must carry: `type`,
    /// `credentialSchema`, and `credentialSubject`, with every schema entry
    /// naming a non-empty string `id`.
    pub fn validate(&self) -> Result<(), VcError> {
        for key in ["type", "credentialSchema", "credentialSubject"] {
            if !self.0.contains_key(key) {
                return Err(VcError::MissingField(key.into()));
            }
        }
        let schemas = match self.0.get("credentialSchema") {
            Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        };
        for schema in schemas {
            match schema.get("id") {
                Some(Value::String(id)) if !id.is_empty() => {}
                Some(_) => {
                    return Err(VcError::InvalidContents(
                        "credentialSchema.id must be a non-empty string".into(),
                    ))
                }
                None => return Err(VcError::MissingField("credentialSchema.id".into())),
            }
        }
        Ok(())
    }

    /// Sign the document with a `DataIntegrityProof` (`ecdsa-rdfc-2019`)
    /// and embed it.
    ///
    /// The private key is checked against the key published for
    /// `verification_method` first. `@context` URLs are resolved through
    /// `loader`. On any error the document is left unchanged.
    pub async fn add_data_integrity_proof<R, L>(
        &mut self,
        private_key_hex: &str,
        verification_method: &str,
        proof_purpose: &str,
        resolver: &VerificationMethodResolver<R>,
        loader: &L,
    ) -> Result<(), VcError>
    where
        R: DidResolver,
        L: DocumentLoader + Sync + ?Sized,
    {
        if verification_method.is_empty() {
            return Err(VcError::MissingField("verificationMethod".into()));
        }
        if proof_purpose.is_empty() {
            return Err(VcError::MissingField("proofPurpose".into()));
        }
        if !resolver
            .check_verification_method(private_key_hex, verification_method)
            .await?
        {
            return Err(VcError::VerificationFailed(format!(
                "private key does not match {verification_method}"
            )));
        }

        let mut proof = Proof::data_integrity(verification_method, proof_purpose);
        let digest = self.canonical_digest_with(loader)?;
        let signature = sign(digest.as_bytes(), private_key_hex)?;
        proof.proof_value = Some(encode_hex(signature));
        self.set_proof(&proof)?;
        tracing::debug!(verification_method, "embedded data integrity proof");
        Ok(())
    }

    /// Verify the embedded proof. A mismatch is
    /// [`VcError::VerificationFailed`], never `Ok` with a flag.
    pub async fn verify_proof<R, L>(&self, resolver: &VerificationMethodResolver<R>, loader: &L) -> Result<(), VcError>
    where
        R: DidResolver,
        L: DocumentLoader + Sync + ?Sized,
    {
        let proof = self.proof()?;
        ProofKind::classify(&proof)?.verify(self, resolver, loader).await
    }
}
