//! # Proof Model and Dispatch
//!
//! A credential carries at most one embedded proof. Verification classifies
//! it into a [`ProofKind`], and each kind has exactly one handler that
//! builds its own message and picks its own key:
//!
//! | Kind | Message | Key |
//! |------|---------|-----|
//! | `DataIntegrityProof` + `ecdsa-rdfc-2019` | SHA-256 of the canonical N-Quads | exact verification method |
//! | `EcdsaSecp256k1Signature2019` with `jws` | SHA-256 of `header.payload` | first key of the DID |
//! | `EcdsaSecp256k1Signature2019` with `proofValue` | compact JSON of the document without `proof` | exact verification method |
//! | `JwtProof2020` | none | none |
//!
//! `EcdsaSecp256k1VerificationKey2019` is accepted as an alias of
//! `EcdsaSecp256k1Signature2019`.
//!
//! The legacy `proofValue` message is not hashed, so the signature binds
//! only the leading 256 bits of the JSON. Issue `DataIntegrityProof`
//! instead.

use credkit_core::{base64url_decode, encode_hex, sha256_bytes, Timestamp};
use credkit_crypto::verify;
use credkit_did::{DidResolver, VerificationMethodResolver};
use credkit_jsonld::DocumentLoader;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::CredentialData;
use crate::error::VcError;

/// Cryptosuite identifier for ECDSA over RDFC-1.0 canonical N-Quads.
pub const ECDSA_RDFC_2019: &str = "ecdsa-rdfc-2019";

/// Proof purpose written by [`CredentialData::add_data_integrity_proof`].
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// The `type` of an embedded proof.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProofType {
    DataIntegrityProof,
    EcdsaSecp256k1Signature2019,
    /// Verification key type some issuers write as a proof type.
    EcdsaSecp256k1VerificationKey2019,
    JwtProof2020,
    /// Any other type string, kept verbatim.
    Other(String),
}

impl ProofType {
    pub fn as_str(&self) -> &str {
        match self {
            ProofType::DataIntegrityProof => "DataIntegrityProof",
            ProofType::EcdsaSecp256k1Signature2019 => "EcdsaSecp256k1Signature2019",
            ProofType::EcdsaSecp256k1VerificationKey2019 => "EcdsaSecp256k1VerificationKey2019",
            ProofType::JwtProof2020 => "JwtProof2020",
            ProofType::Other(s) => s.as_str(),
        }
    }

    /// Both spellings of the legacy secp256k1 proof.
    pub fn is_legacy_secp256k1(&self) -> bool {
        matches!(
            self,
            ProofType::EcdsaSecp256k1Signature2019 | ProofType::EcdsaSecp256k1VerificationKey2019
        )
    }
}

impl From<String> for ProofType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DataIntegrityProof" => ProofType::DataIntegrityProof,
            "EcdsaSecp256k1Signature2019" => ProofType::EcdsaSecp256k1Signature2019,
            "EcdsaSecp256k1VerificationKey2019" => ProofType::EcdsaSecp256k1VerificationKey2019,
            "JwtProof2020" => ProofType::JwtProof2020,
            _ => ProofType::Other(s),
        }
    }
}

impl From<ProofType> for String {
    fn from(t: ProofType) -> Self {
        match t {
            ProofType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ProofType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn has_no_disclosures(value: &Option<Vec<String>>) -> bool {
    value.as_ref().map_or(true, Vec::is_empty)
}

/// An embedded credential proof.
///
/// Serializes with the W3C member names in a fixed order; optional members
/// that are absent or empty are left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: ProofType,

    #[serde(default)]
    pub created: String,

    #[serde(rename = "verificationMethod", default)]
    pub verification_method: String,

    #[serde(rename = "proofPurpose", default)]
    pub proof_purpose: String,

    /// Hex-encoded signature.
    #[serde(rename = "proofValue", default, skip_serializing_if = "is_blank")]
    pub proof_value: Option<String>,

    /// Detached compact JWS (`header..signature` or `header.payload.signature`).
    #[serde(default, skip_serializing_if = "is_blank")]
    pub jws: Option<String>,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub cryptosuite: Option<String>,

    #[serde(default, skip_serializing_if = "has_no_disclosures")]
    pub disclosures: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub challenge: Option<String>,

    #[serde(default, skip_serializing_if = "is_blank")]
    pub domain: Option<String>,

    /// Raw signature bytes for a JWT credential's detached signature.
    /// Never part of the JSON form.
    #[serde(skip)]
    pub signature: Option<Vec<u8>>,
}

impl Proof {
    /// An unsigned `DataIntegrityProof` using `ecdsa-rdfc-2019`, created now.
    pub fn data_integrity(verification_method: impl Into<String>, proof_purpose: impl Into<String>) -> Self {
        Self {
            proof_type: ProofType::DataIntegrityProof,
            created: Timestamp::now().to_rfc3339_millis(),
            verification_method: verification_method.into(),
            proof_purpose: proof_purpose.into(),
            proof_value: None,
            jws: None,
            cryptosuite: Some(ECDSA_RDFC_2019.to_string()),
            disclosures: None,
            challenge: None,
            domain: None,
            signature: None,
        }
    }

    /// A proof carrying only detached signature bytes, for JWT credentials.
    pub fn detached(signature: Vec<u8>) -> Self {
        Self {
            proof_type: ProofType::JwtProof2020,
            created: String::new(),
            verification_method: String::new(),
            proof_purpose: String::new(),
            proof_value: None,
            jws: None,
            cryptosuite: None,
            disclosures: None,
            challenge: None,
            domain: None,
            signature: Some(signature),
        }
    }

    /// Decode a proof object. An array yields its first element.
    pub fn from_value(value: &Value) -> Result<Self, VcError> {
        let first = match value {
            Value::Array(items) => items
                .first()
                .ok_or_else(|| VcError::Parse("proof array is empty".into()))?,
            other => other,
        };
        if !first.is_object() {
            return Err(VcError::Parse("proof must be a JSON object".into()));
        }
        serde_json::from_value(first.clone()).map_err(|e| VcError::Parse(format!("invalid proof: {e}")))
    }

    pub fn to_value(&self) -> Result<Value, VcError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn proof_value(&self) -> Option<&str> {
        self.proof_value.as_deref().filter(|s| !s.is_empty())
    }

    pub fn jws(&self) -> Option<&str> {
        self.jws.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether the proof carries a signature in either embedded form.
    pub fn has_embedded_signature(&self) -> bool {
        self.proof_value().is_some() || self.jws().is_some()
    }
}

/// A classified proof, borrowing the fields its handler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofKind<'a> {
    DataIntegrity {
        verification_method: &'a str,
        proof_value: &'a str,
    },
    LegacyJws {
        verification_method: &'a str,
        jws: &'a str,
    },
    LegacyProofValue {
        verification_method: &'a str,
        proof_value: &'a str,
    },
    JwtProof2020,
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, VcError> {
    value
        .filter(|s| !s.is_empty())
        .ok_or_else(|| VcError::MissingField(format!("proof.{field}")))
}

impl<'a> ProofKind<'a> {
    /// Pick the handler for `proof`.
    pub fn classify(proof: &'a Proof) -> Result<Self, VcError> {
        let vm = Some(proof.verification_method.as_str());
        match &proof.proof_type {
            ProofType::DataIntegrityProof if proof.cryptosuite.as_deref() == Some(ECDSA_RDFC_2019) => {
                Ok(ProofKind::DataIntegrity {
                    verification_method: required(vm, "verificationMethod")?,
                    proof_value: required(proof.proof_value(), "proofValue")?,
                })
            }
            t if t.is_legacy_secp256k1() => match proof.jws() {
                Some(jws) => Ok(ProofKind::LegacyJws {
                    verification_method: required(vm, "verificationMethod")?,
                    jws,
                }),
                None => Ok(ProofKind::LegacyProofValue {
                    proof_value: required(proof.proof_value(), "proofValue")?,
                    verification_method: required(vm, "verificationMethod")?,
                }),
            },
            ProofType::JwtProof2020 => Ok(ProofKind::JwtProof2020),
            other => Err(VcError::UnsupportedProof(match proof.cryptosuite.as_deref() {
                Some(suite) => format!("{other} with cryptosuite {suite}"),
                None => other.to_string(),
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProofKind::DataIntegrity { .. } => "data-integrity",
            ProofKind::LegacyJws { .. } => "legacy-jws",
            ProofKind::LegacyProofValue { .. } => "legacy-proof-value",
            ProofKind::JwtProof2020 => "jwt-proof-2020",
        }
    }

    /// Verify `document` against this proof. Every failure is an error.
    /// `loader` serves the `@context` documents canonicalization needs.
    pub async fn verify<R, L>(
        &self,
        document: &CredentialData,
        resolver: &VerificationMethodResolver<R>,
        loader: &L,
    ) -> Result<(), VcError>
    where
        R: DidResolver,
        L: DocumentLoader + Sync + ?Sized,
    {
        tracing::debug!(kind = self.name(), "verifying embedded proof");
        let valid = match *self {
            ProofKind::DataIntegrity {
                verification_method,
                proof_value,
            } => {
                let public_key = resolver.resolve_public_key(verification_method).await?;
                let digest = document.canonical_digest_with(loader)?;
                verify(&public_key, proof_value, digest.as_bytes())?
            }
            ProofKind::LegacyJws {
                verification_method,
                jws,
            } => {
                let (signature, message) = split_jws(jws)?;
                let public_key = resolver.resolve_default_public_key(verification_method).await?;
                verify(&public_key, &encode_hex(signature), sha256_bytes(message.as_bytes()).as_bytes())?
            }
            ProofKind::LegacyProofValue {
                verification_method,
                proof_value,
            } => {
                let message = document.to_json_bytes_without_proof()?;
                let public_key = resolver.resolve_public_key(verification_method).await?;
                verify(&public_key, proof_value, &message)?
            }
            ProofKind::JwtProof2020 => {
                return Err(VcError::UnsupportedProof(
                    "JwtProof2020 verification is not implemented".into(),
                ))
            }
        };
        if valid {
            Ok(())
        } else {
            tracing::warn!(kind = self.name(), "embedded proof signature mismatch");
            Err(VcError::VerificationFailed(format!("{} proof signature does not match", self.name())))
        }
    }
}

/// Signature bytes and `header.payload` signing input of a compact JWS.
fn split_jws(jws: &str) -> Result<(Vec<u8>, String), VcError> {
    let parts: Vec<&str> = jws.split('.').collect();
    if parts.len() != 3 {
        return Err(VcError::Parse(format!("invalid JWS: expected 3 segments, got {}", parts.len())));
    }
    let signature = base64url_decode(parts[2])?;
    Ok((signature, format!("{}.{}", parts[0], parts[1])))
}
