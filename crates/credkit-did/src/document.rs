//! # DID Document Model
//!
//! The subset of a DID document the resolver reads: verification methods
//! carrying either `publicKeyHex` or a secp256k1 `publicKeyJwk`. Keys are
//! handed out as hex without a `0x` prefix; JWK keys become the
//! uncompressed SEC1 point `04 || x || y`.

use credkit_core::{base64url_decode, encode_hex, strip_hex_prefix};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ResolverError;

/// A resolved DID document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidDocument {
    #[serde(rename = "@context", default, skip_serializing_if = "Value::is_null")]
    pub context: Value,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub verification_method: Vec<VerificationMethodEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion_method: Option<Vec<Value>>,
}

impl DidDocument {
    /// The verification method whose `id` equals `id` exactly.
    pub fn find(&self, id: &str) -> Option<&VerificationMethodEntry> {
        self.verification_method.iter().find(|vm| vm.id == id)
    }

    /// The first listed verification method.
    pub fn default_method(&self) -> Option<&VerificationMethodEntry> {
        self.verification_method.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethodEntry {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub method_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_hex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<Jwk>,
}

impl VerificationMethodEntry {
    /// Public key as hex. `publicKeyHex` wins over `publicKeyJwk`.
    pub fn public_key(&self) -> Result<String, ResolverError> {
        if let Some(hex) = self.public_key_hex.as_deref().filter(|h| !h.is_empty()) {
            return Ok(strip_hex_prefix(hex).to_string());
        }
        if let Some(jwk) = &self.public_key_jwk {
            return jwk.to_hex();
        }
        Err(ResolverError::KeyNotFound(format!(
            "verification method {} carries no public key",
            self.id
        )))
    }
}

/// JSON Web Key holding an EC public point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    #[serde(default)]
    pub kty: String,
    #[serde(default)]
    pub crv: String,
    #[serde(default)]
    pub x: String,
    #[serde(default)]
    pub y: String,
}

const COORDINATE_LEN: usize = 32;

impl Jwk {
    /// Uncompressed SEC1 point `04 || x || y` as lowercase hex.
    pub fn to_hex(&self) -> Result<String, ResolverError> {
        if self.kty != "EC" {
            return Err(ResolverError::UnsupportedKey(format!("key type {:?}", self.kty)));
        }
        if self.crv != "secp256k1" {
            return Err(ResolverError::UnsupportedKey(format!("curve {:?}", self.crv)));
        }
        let mut point = Vec::with_capacity(1 + 2 * COORDINATE_LEN);
        point.push(0x04);
        point.extend(coordinate("x", &self.x)?);
        point.extend(coordinate("y", &self.y)?);
        Ok(encode_hex(point))
    }
}

fn coordinate(name: &str, encoded: &str) -> Result<Vec<u8>, ResolverError> {
    let bytes = base64url_decode(encoded)
        .map_err(|e| ResolverError::UnsupportedKey(format!("JWK {name} coordinate: {e}")))?;
    if bytes.len() != COORDINATE_LEN {
        return Err(ResolverError::UnsupportedKey(format!(
            "JWK {name} coordinate is {} bytes, expected {COORDINATE_LEN}",
            bytes.len()
        )));
    }
    Ok(bytes)
}
