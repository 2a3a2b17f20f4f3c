//! # DID Resolution over HTTP
//!
//! [`DidResolver`] is the seam between the credential engines and whatever
//! produces DID documents. [`HttpDidResolver`] fetches
//! `GET {base_url}/{urlencoded did}` and treats any non-2xx status as a hard
//! failure. Retries and caching are NOT built in; wrap the resolver in
//! another [`DidResolver`] to add them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::ResolverConfig;
use crate::document::DidDocument;
use crate::error::ResolverError;

/// Everything but RFC 3986 unreserved characters is escaped, so a space
/// becomes `%20`, never `+`.
const DID_PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Produces the DID document for a DID.
#[async_trait]
pub trait DidResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError>;
}

#[async_trait]
impl<R: DidResolver + ?Sized> DidResolver for Arc<R> {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        (**self).resolve(did).await
    }
}

/// Resolver backed by an HTTP DID resolution endpoint.
#[derive(Debug, Clone)]
pub struct HttpDidResolver {
    client: reqwest::Client,
    base_url: String,
}

impl HttpDidResolver {
    pub fn new(config: ResolverConfig) -> Result<Self, ResolverError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ResolverError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        let base_url = config.base_url().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// URL the document for `did` is fetched from.
    pub fn document_url(&self, did: &str) -> String {
        format!("{}/{}", self.base_url, utf8_percent_encode(did, DID_PATH_SEGMENT))
    }
}

#[async_trait]
impl DidResolver for HttpDidResolver {
    async fn resolve(&self, did: &str) -> Result<DidDocument, ResolverError> {
        let endpoint = self.document_url(did);
        tracing::debug!(%did, %endpoint, "resolving DID document");

        let resp = self
            .client
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| ResolverError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%did, status = status.as_u16(), "DID resolver returned an error");
            return Err(ResolverError::Resolution {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<DidDocument>()
            .await
            .map_err(|e| ResolverError::Deserialization { endpoint, source: e })
    }
}
