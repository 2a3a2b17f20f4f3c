//! Per-call credential options.

use std::fmt;
use std::sync::Arc;

use credkit_did::{
    DidResolver, HttpDidResolver, ResolverConfig, VerificationMethodResolver, DEFAULT_BASE_URL,
};

use credkit_jsonld::{DocumentLoader, SharedDocumentLoader, StaticDocumentLoader};

use crate::error::VcError;

/// Default verification method fragment appended to the issuer DID.
pub const DEFAULT_VERIFICATION_METHOD_KEY: &str = "key-1";

/// Options accepted by credential construction, signing, and verification.
///
/// Keys are resolved through the injected [`DidResolver`] when one is set,
/// otherwise through an [`HttpDidResolver`] against `did_base_url`.
/// Remote `@context` documents come from the injected [`DocumentLoader`],
/// or from a [`StaticDocumentLoader`] that knows only the credentials v2
/// context.
#[derive(Clone)]
pub struct CredentialOptions {
    did_base_url: String,
    verification_method_key: String,
    validate_schema: bool,
    verify_proof: bool,
    resolver: Option<Arc<dyn DidResolver>>,
    document_loader: Option<SharedDocumentLoader>,
}

impl fmt::Debug for CredentialOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialOptions")
            .field("did_base_url", &self.did_base_url)
            .field("verification_method_key", &self.verification_method_key)
            .field("validate_schema", &self.validate_schema)
            .field("verify_proof", &self.verify_proof)
            .field("resolver", &self.resolver.as_ref().map(|_| "<injected>"))
            .field("document_loader", &self.document_loader.as_ref().map(|_| "<injected>"))
            .finish()
    }
}

impl Default for CredentialOptions {
    fn default() -> Self {
        Self {
            did_base_url: DEFAULT_BASE_URL.to_string(),
            verification_method_key: DEFAULT_VERIFICATION_METHOD_KEY.to_string(),
            validate_schema: false,
            verify_proof: false,
            resolver: None,
            document_loader: None,
        }
    }
}

impl CredentialOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.did_base_url = base_url.into();
        self
    }

    pub fn with_verification_method_key(mut self, key: impl Into<String>) -> Self {
        self.verification_method_key = key.into();
        self
    }

    /// Request JSON-Schema validation. Not supported: construction and
    /// parsing fail with [`VcError::NotImplemented`] when set.
    pub fn with_schema_validation(mut self) -> Self {
        self.validate_schema = true;
        self
    }

    /// Verify the proof as part of construction or parsing.
    pub fn with_verify_proof(mut self) -> Self {
        self.verify_proof = true;
        self
    }

    /// Resolve DID documents through `resolver` instead of HTTP.
    pub fn with_resolver(mut self, resolver: Arc<dyn DidResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Dereference `@context` URLs through `loader` when canonicalizing.
    pub fn with_document_loader(mut self, loader: Arc<dyn DocumentLoader + Send + Sync>) -> Self {
        self.document_loader = Some(loader);
        self
    }

    pub fn did_base_url(&self) -> &str {
        &self.did_base_url
    }

    pub fn verification_method_key(&self) -> &str {
        &self.verification_method_key
    }

    pub fn validate_schema(&self) -> bool {
        self.validate_schema
    }

    pub fn verify_proof(&self) -> bool {
        self.verify_proof
    }

    pub fn document_loader(&self) -> Option<&SharedDocumentLoader> {
        self.document_loader.as_ref()
    }

    pub(crate) fn loader_or_default(&self) -> SharedDocumentLoader {
        match &self.document_loader {
            Some(loader) => Arc::clone(loader),
            None => Arc::new(StaticDocumentLoader::new()),
        }
    }

    /// The verification-method resolver these options select.
    pub fn vm_resolver(&self) -> Result<VerificationMethodResolver<Arc<dyn DidResolver>>, VcError> {
        let resolver: Arc<dyn DidResolver> = match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => {
                let config = ResolverConfig::new(&self.did_base_url).map_err(credkit_did::ResolverError::from)?;
                Arc::new(HttpDidResolver::new(config)?)
            }
        };
        Ok(VerificationMethodResolver::new(resolver))
    }
}
