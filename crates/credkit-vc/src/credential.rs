//! # Credential Interface and Format Detection
//!
//! [`Credential`] is the surface both encodings share. [`parse_credential`]
//! accepts raw bytes of either encoding and returns an [`AnyCredential`]:
//!
//! - a JSON object is a JSON-LD credential with an embedded proof;
//! - otherwise, after trimming surrounding quotes, three dot-separated
//!   base64url segments are a JWT;
//! - anything else is [`VcError::Parse`].

use async_trait::async_trait;
use serde_json::Value;

use crate::error::VcError;
use crate::json_credential::JsonCredential;
use crate::jwt_credential::JwtCredential;
use crate::options::CredentialOptions;
use crate::proof::Proof;

/// The two credential encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialFormat {
    /// JSON-LD with an embedded proof.
    Json,
    /// Compact JWS carrying the credential in its `vc` claim.
    Jwt,
}

impl CredentialFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialFormat::Json => "JSON",
            CredentialFormat::Jwt => "JWT",
        }
    }
}

impl std::fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations shared by JSON-LD and JWT credentials.
#[async_trait]
pub trait Credential: Send + Sync {
    /// Sign with `private_key_hex` and attach the resulting proof.
    async fn add_proof(&mut self, private_key_hex: &str, options: &CredentialOptions) -> Result<(), VcError>;

    /// The bytes a signer commits to. For JSON-LD this is the SHA-256 of
    /// the canonical form; for JWT the `header.payload` string.
    fn signing_input(&self) -> Result<Vec<u8>, VcError>;

    /// Attach a proof produced elsewhere.
    fn add_custom_proof(&mut self, proof: Proof) -> Result<(), VcError>;

    /// Verify the proof. Success is `Ok(())`; every failure is an error.
    async fn verify(&self, options: &CredentialOptions) -> Result<(), VcError>;

    /// The credential in its native encoding: a JSON object or a JWT string.
    fn serialize(&self) -> Result<Value, VcError>;

    /// Compact JSON of the credential body.
    fn contents(&self) -> Result<Vec<u8>, VcError>;

    fn credential_type(&self) -> CredentialFormat;
}

/// A parsed credential of either encoding.
#[derive(Debug, Clone)]
pub enum AnyCredential {
    Json(JsonCredential),
    Jwt(JwtCredential),
}

impl AnyCredential {
    pub fn as_json(&self) -> Option<&JsonCredential> {
        match self {
            AnyCredential::Json(c) => Some(c),
            AnyCredential::Jwt(_) => None,
        }
    }

    pub fn as_jwt(&self) -> Option<&JwtCredential> {
        match self {
            AnyCredential::Jwt(c) => Some(c),
            AnyCredential::Json(_) => None,
        }
    }

    fn inner(&self) -> &dyn Credential {
        match self {
            AnyCredential::Json(c) => c,
            AnyCredential::Jwt(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Credential {
        match self {
            AnyCredential::Json(c) => c,
            AnyCredential::Jwt(c) => c,
        }
    }
}

impl From<JsonCredential> for AnyCredential {
    fn from(c: JsonCredential) -> Self {
        AnyCredential::Json(c)
    }
}

impl From<JwtCredential> for AnyCredential {
    fn from(c: JwtCredential) -> Self {
        AnyCredential::Jwt(c)
    }
}

#[async_trait]
impl Credential for AnyCredential {
    async fn add_proof(&mut self, private_key_hex: &str, options: &CredentialOptions) -> Result<(), VcError> {
        self.inner_mut().add_proof(private_key_hex, options).await
    }

    fn signing_input(&self) -> Result<Vec<u8>, VcError> {
        self.inner().signing_input()
    }

    fn add_custom_proof(&mut self, proof: Proof) -> Result<(), VcError> {
        self.inner_mut().add_custom_proof(proof)
    }

    async fn verify(&self, options: &CredentialOptions) -> Result<(), VcError> {
        self.inner().verify(options).await
    }

    fn serialize(&self) -> Result<Value, VcError> {
        self.inner().serialize()
    }

    fn contents(&self) -> Result<Vec<u8>, VcError> {
        self.inner().contents()
    }

    fn credential_type(&self) -> CredentialFormat {
        self.inner().credential_type()
    }
}

/// Schema validation and proof verification both run when requested.
pub(crate) async fn execute_options<C: Credential + ?Sized>(
    credential: &C,
    options: &CredentialOptions,
) -> Result<(), VcError> {
    if options.validate_schema() {
        return Err(VcError::NotImplemented("credential schema validation".into()));
    }
    if options.verify_proof() {
        credential.verify(options).await?;
    }
    Ok(())
}

fn is_base64url_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Whether `raw`, with surrounding quotes trimmed, has the shape of a
/// signed compact JWT: exactly three non-empty base64url segments.
pub fn is_jwt(raw: &str) -> bool {
    let segments: Vec<&str> = raw.trim_matches('"').split('.').collect();
    segments.len() == 3 && segments.iter().all(|s| is_base64url_segment(s))
}

/// Parse a credential of either encoding.
pub async fn parse_credential(raw: &[u8], options: &CredentialOptions) -> Result<AnyCredential, VcError> {
    if raw.is_empty() {
        return Err(VcError::Parse("credential is empty".into()));
    }
    if matches!(serde_json::from_slice::<Value>(raw), Ok(Value::Object(_))) {
        tracing::debug!("detected JSON-LD credential");
        return Ok(JsonCredential::parse(raw, options).await?.into());
    }
    let text = std::str::from_utf8(raw).map_err(|e| VcError::Parse(format!("credential is not UTF-8: {e}")))?;
    if is_jwt(text) {
        tracing::debug!("detected JWT credential");
        return Ok(JwtCredential::parse(text, options).await?.into());
    }
    Err(VcError::Parse("not a JSON-LD object or a compact JWT".into()))
}

/// [`parse_credential`] with schema validation and proof verification
/// switched on.
pub async fn parse_credential_with_validation(
    raw: &[u8],
    options: &CredentialOptions,
) -> Result<AnyCredential, VcError> {
    let options = options.clone().with_schema_validation().with_verify_proof();
    parse_credential(raw, &options).await
}
