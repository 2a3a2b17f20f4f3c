//! # Document Loading — Remote `@context` Resolution
//!
//! A `@context` entry that is a URL is dereferenced through a
//! [`DocumentLoader`]. The canonicalizer never touches the network: the
//! default [`StaticDocumentLoader`] serves the bundled credentials v2
//! context and whatever documents the caller registers, and fails with
//! [`CanonicalizationError::UnknownContext`] for anything else.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use credkit_core::CanonicalizationError;
use iref::Iri;
use json_ld::{LoadError, Loader, RemoteDocument};
use serde_json::Value;

/// URL of the W3C Verifiable Credentials Data Model v2.0 context.
pub const CREDENTIALS_V2_URL: &str = "https://www.w3.org/ns/credentials/v2";

const CREDENTIALS_V2: &str = include_str!("../contexts/credentials-v2.json");

/// Resolves a context URL to its JSON-LD document.
///
/// The returned document must carry a top-level `@context` entry.
pub trait DocumentLoader {
    fn load(&self, url: &str) -> Result<Value, CanonicalizationError>;
}

/// A loader shared between credentials and options.
pub type SharedDocumentLoader = Arc<dyn DocumentLoader + Send + Sync>;

impl<L: DocumentLoader + ?Sized> DocumentLoader for &L {
    fn load(&self, url: &str) -> Result<Value, CanonicalizationError> {
        (**self).load(url)
    }
}

impl<L: DocumentLoader + ?Sized> DocumentLoader for Arc<L> {
    fn load(&self, url: &str) -> Result<Value, CanonicalizationError> {
        (**self).load(url)
    }
}

/// In-memory loader with the credentials v2 context preloaded.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentLoader {
    registered: HashMap<String, Value>,
}

impl StaticDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the document served for `url`.
    pub fn with_document(mut self, url: impl Into<String>, document: Value) -> Self {
        self.insert(url, document);
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, document: Value) {
        self.registered.insert(url.into(), document);
    }

    /// Share as a [`SharedDocumentLoader`].
    pub fn shared(self) -> SharedDocumentLoader {
        Arc::new(self)
    }
}

impl DocumentLoader for StaticDocumentLoader {
    fn load(&self, url: &str) -> Result<Value, CanonicalizationError> {
        if let Some(doc) = self.registered.get(url) {
            return Ok(doc.clone());
        }
        if url == CREDENTIALS_V2_URL {
            return Ok(serde_json::from_str(CREDENTIALS_V2)?);
        }
        Err(CanonicalizationError::UnknownContext(url.to_string()))
    }
}

/// Serves a [`DocumentLoader`] to the JSON-LD processor.
///
/// The processor wraps loader failures in its own error type; the first
/// failure is kept here so callers get the loader's error back unchanged.
pub(crate) struct ProcessorLoader<'a, L: ?Sized> {
    inner: &'a L,
    failure: Mutex<Option<CanonicalizationError>>,
}

impl<'a, L: DocumentLoader + ?Sized> ProcessorLoader<'a, L> {
    pub(crate) fn new(inner: &'a L) -> Self {
        Self {
            inner,
            failure: Mutex::new(None),
        }
    }

    /// The first loader failure, if any.
    pub(crate) fn take_failure(&self) -> Option<CanonicalizationError> {
        self.failure.lock().ok().and_then(|mut slot| slot.take())
    }

    fn fetch(&self, url: &str) -> Result<Value, CanonicalizationError> {
        let document = self.inner.load(url)?;
        if document.get("@context").is_none() {
            return Err(CanonicalizationError::InvalidContext(format!(
                "{url} has no top-level @context"
            )));
        }
        Ok(document)
    }
}

impl<L: DocumentLoader + ?Sized> Loader for ProcessorLoader<'_, L> {
    async fn load(&self, url: &Iri) -> Result<RemoteDocument, LoadError> {
        match self.fetch(url.as_str()) {
            Ok(document) => Ok(RemoteDocument::new(
                Some(url.to_owned()),
                None,
                json_syntax::Value::from(document),
            )),
            Err(err) => {
                tracing::debug!(url = url.as_str(), error = %err, "context not available");
                let cause = CanonicalizationError::InvalidContext(err.to_string());
                if let Ok(mut slot) = self.failure.lock() {
                    slot.get_or_insert(err);
                }
                Err(LoadError::new(url.to_owned(), cause))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_v2_context_parses() {
        let doc = StaticDocumentLoader::new().load(CREDENTIALS_V2_URL).unwrap();
        let ctx = doc.get("@context").and_then(Value::as_object).unwrap();
        assert_eq!(ctx.get("@protected"), Some(&json!(true)));
        assert!(ctx.contains_key("VerifiableCredential"));
        assert!(ctx.contains_key("DataIntegrityProof"));
    }

    #[test]
    fn unknown_url_is_an_error() {
        let err = StaticDocumentLoader::new()
            .load("https://www.w3.org/2018/credentials/v1")
            .unwrap_err();
        assert!(matches!(err, CanonicalizationError::UnknownContext(u) if u.ends_with("/v1")));
    }

    #[test]
    fn registered_document_is_served() {
        let loader = StaticDocumentLoader::new()
            .with_document("https://example.org/ctx", json!({"@context": {"x": "https://example.org/x"}}));
        let doc = loader.load("https://example.org/ctx").unwrap();
        assert_eq!(doc["@context"]["x"], json!("https://example.org/x"));
    }

    #[test]
    fn loader_works_through_arc_and_reference() {
        let loader = StaticDocumentLoader::new().shared();
        assert!(loader.load(CREDENTIALS_V2_URL).is_ok());
        assert!((&*loader).load(CREDENTIALS_V2_URL).is_ok());
    }

    #[test]
    fn processor_loader_rejects_documents_without_context() {
        let inner = StaticDocumentLoader::new().with_document("https://example.org/bare", json!({"x": 1}));
        let loader = ProcessorLoader::new(&inner);
        assert!(matches!(
            loader.fetch("https://example.org/bare"),
            Err(CanonicalizationError::InvalidContext(_))
        ));
        assert!(loader.take_failure().is_none());
    }
}
