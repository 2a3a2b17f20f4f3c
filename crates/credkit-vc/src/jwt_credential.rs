//! # JWT Credentials
//!
//! The credential body travels in the `vc` claim of a compact JWS signed
//! with `ES256K`. Registered claims mirror the body:
//!
//! | Claim | Source |
//! |-------|--------|
//! | `iss` | `issuer` |
//! | `sub` | first `credentialSubject.id` |
//! | `exp` | `validUntil` (Unix seconds) |
//! | `iat`, `nbf` | `validFrom` (Unix seconds) |
//! | `jti` | `id` |
//!
//! The header and payload are encoded once at construction; signing only
//! adds the detached third segment.

use async_trait::async_trait;
use credkit_core::{base64url_decode, base64url_encode, encode_hex, sha256_bytes};
use credkit_crypto::{sign_jwt, verify};
use credkit_did::did_of;
use serde_json::{json, Map, Value};

use crate::contents::CredentialContents;
use crate::credential::{execute_options, Credential, CredentialFormat};
use crate::data::CredentialData;
use crate::error::VcError;
use crate::options::CredentialOptions;
use crate::proof::Proof;

/// JOSE algorithm name for ECDSA over secp256k1 with SHA-256.
pub const ES256K: &str = "ES256K";

/// A JWT-encoded Verifiable Credential.
#[derive(Debug, Clone, PartialEq)]
pub struct JwtCredential {
    /// `base64url(header).base64url(payload)`.
    signing_input: String,
    /// The `vc` claim.
    payload: CredentialData,
    /// base64url `r || s`, once signed.
    signature: Option<String>,
}

impl JwtCredential {
    /// Encode `contents` as an unsigned JWT, then apply `options`.
    pub async fn new(contents: &CredentialContents, options: &CredentialOptions) -> Result<Self, VcError> {
        let vc = CredentialData::from_contents(contents)?;

        let mut header = Map::new();
        header.insert("typ".into(), json!("JWT"));
        header.insert("alg".into(), json!(ES256K));
        header.insert(
            "kid".into(),
            json!(format!(
                "{}#{}",
                contents.issuer().unwrap_or_default(),
                options.verification_method_key()
            )),
        );

        let mut payload = Map::new();
        payload.insert("vc".into(), Value::Object(vc.as_map().clone()));
        if let Some(issuer) = contents.issuer() {
            payload.insert("iss".into(), json!(issuer));
        }
        if let Some(subject) = contents.first_subject_id() {
            payload.insert("sub".into(), json!(subject));
        }
        if let Some(until) = &contents.valid_until {
            payload.insert("exp".into(), json!(until.epoch_secs()));
        }
        if let Some(from) = &contents.valid_from {
            payload.insert("iat".into(), json!(from.epoch_secs()));
            payload.insert("nbf".into(), json!(from.epoch_secs()));
        }
        if let Some(id) = contents.id.as_deref().filter(|s| !s.is_empty()) {
            payload.insert("jti".into(), json!(id));
        }

        let signing_input = format!(
            "{}.{}",
            base64url_encode(serde_json::to_vec(&header)?),
            base64url_encode(serde_json::to_vec(&payload)?)
        );
        let credential = Self {
            signing_input,
            payload: vc,
            signature: None,
        };
        execute_options(&credential, options).await?;
        Ok(credential)
    }

    /// Parse a compact JWT (`h.p.s`, or `h.p` when unsigned), then apply
    /// `options`. Surrounding double quotes are ignored.
    pub async fn parse(raw: &str, options: &CredentialOptions) -> Result<Self, VcError> {
        let raw = raw.trim_matches('"');
        if raw.is_empty() {
            return Err(VcError::Parse("JWT is empty".into()));
        }
        let parts: Vec<&str> = raw.split('.').collect();
        if !(2..=3).contains(&parts.len()) {
            return Err(VcError::Parse(format!(
                "JWT must have 2 or 3 segments, got {}",
                parts.len()
            )));
        }

        let payload: Value = serde_json::from_slice(&base64url_decode(parts[1])?)?;
        let vc = match payload.get("vc") {
            Some(Value::Object(vc)) => CredentialData::from(vc.clone()),
            Some(_) => return Err(VcError::Parse("vc claim must be a JSON object".into())),
            None => return Err(VcError::Parse("JWT payload has no vc claim".into())),
        };

        let credential = Self {
            signing_input: format!("{}.{}", parts[0], parts[1]),
            payload: vc,
            signature: parts.get(2).filter(|s| !s.is_empty()).map(|s| s.to_string()),
        };
        execute_options(&credential, options).await?;
        Ok(credential)
    }

    /// The decoded `vc` claim.
    pub fn payload(&self) -> &CredentialData {
        &self.payload
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The decoded JOSE header.
    pub fn header(&self) -> Result<Map<String, Value>, VcError> {
        let encoded = self.signing_input.split('.').next().unwrap_or_default();
        match serde_json::from_slice(&base64url_decode(encoded)?)? {
            Value::Object(header) => Ok(header),
            _ => Err(VcError::Parse("JWT header must be a JSON object".into())),
        }
    }

    /// The `kid` header parameter.
    pub fn key_id(&self) -> Result<String, VcError> {
        match self.header()?.get("kid") {
            Some(Value::String(kid)) if !kid.is_empty() => Ok(kid.clone()),
            _ => Err(VcError::Parse("JWT header has no kid".into())),
        }
    }

    pub fn to_contents(&self) -> Result<CredentialContents, VcError> {
        self.payload.to_contents()
    }

    /// The compact serialization.
    pub fn to_compact(&self) -> String {
        match &self.signature {
            Some(signature) => format!("{}.{}", self.signing_input, signature),
            None => self.signing_input.clone(),
        }
    }
}

#[async_trait]
impl Credential for JwtCredential {
    async fn add_proof(&mut self, private_key_hex: &str, _options: &CredentialOptions) -> Result<(), VcError> {
        let message = sha256_bytes(self.signing_input.as_bytes());
        self.signature = Some(sign_jwt(message.as_bytes(), private_key_hex)?);
        Ok(())
    }

    fn signing_input(&self) -> Result<Vec<u8>, VcError> {
        Ok(self.signing_input.as_bytes().to_vec())
    }

    fn add_custom_proof(&mut self, proof: Proof) -> Result<(), VcError> {
        match proof.signature.filter(|s| !s.is_empty()) {
            Some(signature) => {
                self.signature = Some(base64url_encode(signature));
                Ok(())
            }
            None => Err(VcError::MissingField("proof.signature".into())),
        }
    }

    async fn verify(&self, options: &CredentialOptions) -> Result<(), VcError> {
        let signature = self
            .signature
            .as_deref()
            .ok_or_else(|| VcError::VerificationFailed("JWT is unsigned".into()))?;
        let kid = self.key_id()?;
        let did = did_of(&kid)?;

        let public_key = options.vm_resolver()?.resolve_default_public_key(did).await?;
        let signature_hex = encode_hex(base64url_decode(signature)?);
        let message = sha256_bytes(self.signing_input.as_bytes());
        if verify(&public_key, &signature_hex, message.as_bytes())? {
            Ok(())
        } else {
            tracing::warn!(kid = %kid, "JWT signature mismatch");
            Err(VcError::VerificationFailed(format!("JWT signature does not match key of {did}")))
        }
    }

    fn serialize(&self) -> Result<Value, VcError> {
        Ok(Value::String(self.to_compact()))
    }

    fn contents(&self) -> Result<Vec<u8>, VcError> {
        self.payload.to_json_bytes()
    }

    fn credential_type(&self) -> CredentialFormat {
        CredentialFormat::Jwt
    }
}
