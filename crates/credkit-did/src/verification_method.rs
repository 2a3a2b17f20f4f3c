//! # Verification-Method Resolution
//!
//! Maps a verification method reference (`did#fragment`) or a bare DID to
//! the hex public key published in the DID document. Each lookup resolves
//! the document afresh.

use credkit_crypto::verify_key_pair;

use crate::config::ResolverConfig;
use crate::document::DidDocument;
use crate::error::ResolverError;
use crate::resolver::{DidResolver, HttpDidResolver};

/// The DID part of a verification method reference (everything before `#`).
pub fn did_of(verification_method: &str) -> Result<&str, ResolverError> {
    match verification_method.split('#').next() {
        Some(did) if !did.is_empty() => Ok(did),
        _ => Err(ResolverError::InvalidVerificationMethod(format!(
            "could not extract a DID from {verification_method:?}"
        ))),
    }
}

/// Public key lookup on top of a [`DidResolver`].
#[derive(Debug, Clone)]
pub struct VerificationMethodResolver<R = HttpDidResolver> {
    resolver: R,
}

impl VerificationMethodResolver<HttpDidResolver> {
    pub fn from_config(config: ResolverConfig) -> Result<Self, ResolverError> {
        Ok(Self::new(HttpDidResolver::new(config)?))
    }

    /// HTTP resolver against `base_url` with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self, ResolverError> {
        Self::from_config(ResolverConfig::new(base_url)?)
    }
}

impl<R: DidResolver> VerificationMethodResolver<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    async fn document(&self, did: &str) -> Result<DidDocument, ResolverError> {
        self.resolver.resolve(did).await
    }

    /// Hex public key of the verification method whose `id` equals
    /// `verification_method` exactly.
    pub async fn resolve_public_key(&self, verification_method: &str) -> Result<String, ResolverError> {
        let did = did_of(verification_method)?;
        let doc = self.document(did).await?;
        let vm = doc.find(verification_method).ok_or_else(|| {
            ResolverError::KeyNotFound(format!(
                "verification method {verification_method} not found in DID document"
            ))
        })?;
        vm.public_key()
    }

    /// Hex public key of the first verification method listed for `did`.
    pub async fn resolve_default_public_key(&self, did: &str) -> Result<String, ResolverError> {
        let did = did_of(did)?;
        let doc = self.document(did).await?;
        let vm = doc.default_method().ok_or_else(|| {
            ResolverError::KeyNotFound(format!("DID document for {did} lists no verification method"))
        })?;
        vm.public_key()
    }

    /// Whether `private_key_hex` is the private half of the key published
    /// for `verification_method`.
    pub async fn check_verification_method(
        &self,
        private_key_hex: &str,
        verification_method: &str,
    ) -> Result<bool, ResolverError> {
        if private_key_hex.is_empty() || verification_method.is_empty() {
            return Err(ResolverError::InvalidVerificationMethod(
                "private key or verification method is empty".into(),
            ));
        }
        let public_key = self.resolve_public_key(verification_method).await?;
        Ok(verify_key_pair(private_key_hex, &public_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn did_of_strips_fragment() {
        assert_eq!(did_of("did:nda:testnet:0xabc#key-1").unwrap(), "did:nda:testnet:0xabc");
        assert_eq!(did_of("did:nda:testnet:0xabc").unwrap(), "did:nda:testnet:0xabc");
    }

    #[test]
    fn did_of_rejects_missing_did() {
        assert!(matches!(did_of("#key-1"), Err(ResolverError::InvalidVerificationMethod(_))));
        assert!(matches!(did_of(""), Err(ResolverError::InvalidVerificationMethod(_))));
    }
}
