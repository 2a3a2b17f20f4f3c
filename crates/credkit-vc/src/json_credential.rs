//! # JSON-LD Credentials
//!
//! A [`JsonCredential`] owns its [`CredentialData`] and the verification
//! method fragment (`key-1` unless configured) that, appended to the
//! issuer DID, names its signing key. `add_proof` embeds a
//! `DataIntegrityProof`; `verify` dispatches on whatever proof is embedded.
//!
//! The document loader in effect at construction is kept with the
//! credential so `signing_input` resolves the same `@context` documents
//! that signing and verification do.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use credkit_jsonld::SharedDocumentLoader;
use serde_json::Value;

use crate::contents::CredentialContents;
use crate::credential::{execute_options, Credential, CredentialFormat};
use crate::data::CredentialData;
use crate::error::VcError;
use crate::options::CredentialOptions;
use crate::proof::{Proof, ASSERTION_METHOD};

/// A JSON-LD Verifiable Credential with an embedded proof.
#[derive(Clone)]
pub struct JsonCredential {
    data: CredentialData,
    verification_method_key: String,
    document_loader: SharedDocumentLoader,
}

impl PartialEq for JsonCredential {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.verification_method_key == other.verification_method_key
    }
}

impl fmt::Debug for JsonCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonCredential")
            .field("data", &self.data)
            .field("verification_method_key", &self.verification_method_key)
            .finish_non_exhaustive()
    }
}

impl JsonCredential {
    /// Build from typed contents, then apply `options`.
    pub async fn new(contents: &CredentialContents, options: &CredentialOptions) -> Result<Self, VcError> {
        let credential = Self::from_data(CredentialData::from_contents(contents)?, options);
        execute_options(&credential, options).await?;
        Ok(credential)
    }

    /// Parse raw JSON, then apply `options`.
    pub async fn parse(raw: &[u8], options: &CredentialOptions) -> Result<Self, VcError> {
        let credential = Self::from_data(CredentialData::from_slice(raw)?, options);
        execute_options(&credential, options).await?;
        Ok(credential)
    }

    /// Wrap existing data without running any option checks.
    pub fn from_data(data: CredentialData, options: &CredentialOptions) -> Self {
        Self {
            data,
            verification_method_key: options.verification_method_key().to_string(),
            document_loader: options.loader_or_default(),
        }
    }

    /// The options' loader when they inject one, else the construction-time loader.
    fn loader_for(&self, options: &CredentialOptions) -> SharedDocumentLoader {
        match options.document_loader() {
            Some(loader) => Arc::clone(loader),
            None => Arc::clone(&self.document_loader),
        }
    }

    pub fn data(&self) -> &CredentialData {
        &self.data
    }

    pub fn into_data(self) -> CredentialData {
        self.data
    }

    pub fn verification_method_key(&self) -> &str {
        &self.verification_method_key
    }

    pub fn to_contents(&self) -> Result<CredentialContents, VcError> {
        self.data.to_contents()
    }
}

#[async_trait]
impl Credential for JsonCredential {
    async fn add_proof(&mut self, private_key_hex: &str, options: &CredentialOptions) -> Result<(), VcError> {
        let issuer = self
            .data
            .issuer()
            .ok_or_else(|| VcError::MissingField("issuer".into()))?;
        let verification_method = format!("{issuer}#{}", self.verification_method_key);
        let resolver = options.vm_resolver()?;
        let loader = self.loader_for(options);
        self.data
            .add_data_integrity_proof(private_key_hex, &verification_method, ASSERTION_METHOD, &resolver, &*loader)
            .await
    }

    fn signing_input(&self) -> Result<Vec<u8>, VcError> {
        Ok(self.data.canonical_digest_with(&*self.document_loader)?.as_bytes().to_vec())
    }

    fn add_custom_proof(&mut self, proof: Proof) -> Result<(), VcError> {
        if !proof.has_embedded_signature() {
            return Err(VcError::MissingField("proofValue or jws".into()));
        }
        self.data.set_proof(&proof)
    }

    async fn verify(&self, options: &CredentialOptions) -> Result<(), VcError> {
        let resolver = options.vm_resolver()?;
        let loader = self.loader_for(options);
        self.data.verify_proof(&resolver, &*loader).await
    }

    fn serialize(&self) -> Result<Value, VcError> {
        if !self.data.has_proof() {
            return Err(VcError::MissingField("proof".into()));
        }
        Ok(Value::Object(self.data.as_map().clone()))
    }

    fn contents(&self) -> Result<Vec<u8>, VcError> {
        self.data.to_json_bytes()
    }

    fn credential_type(&self) -> CredentialFormat {
        CredentialFormat::Json
    }
}
