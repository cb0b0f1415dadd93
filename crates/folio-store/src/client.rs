use std::sync::Arc;
use std::time::Duration;

use folio_crypto::FallbackKeys;
use folio_types::{ContentRef, LocalKind};
use tracing::{debug, info, warn};

use crate::cache::LocalCache;
use crate::config::{StoreConfig, DEFAULT_PROVIDER_TIMEOUT_MS};
use crate::error::{StoreError, StoreResult};
use crate::ipfs::IpfsApiProvider;
use crate::keys;
use crate::pinata::PinataProvider;
use crate::traits::ContentProvider;

/// Outcome of [`ContentStoreClient::upload`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResult {
    pub content: ContentRef,
    /// Fetch URL; `None` for local-only content.
    pub url: Option<String>,
    pub size: u64,
    /// Provider that accepted the blob; `None` when the fallback key was used.
    pub provider: Option<String>,
}

impl UploadResult {
    pub fn is_local_only(&self) -> bool {
        self.content.is_local_only()
    }
}

/// Uploads and resolves blobs across an ordered list of providers.
///
/// Providers are tried in registration order, once each, every call bounded
/// by the client timeout. When none answers an upload, the blob is stored in
/// the local cache under a deterministic fallback key.
pub struct ContentStoreClient {
    providers: Vec<Arc<dyn ContentProvider>>,
    cache: Arc<dyn LocalCache>,
    timeout: Duration,
}

impl ContentStoreClient {
    /// A client with no providers (local-only mode).
    pub fn new(cache: Arc<dyn LocalCache>) -> Self {
        Self {
            providers: Vec::new(),
            cache,
            timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
        }
    }

    /// Build the provider chain from configuration.
    ///
    /// A provider whose construction fails is left out of the chain; the
    /// client still works with whatever remains, down to none.
    pub fn from_config(config: &StoreConfig, cache: Arc<dyn LocalCache>) -> Self {
        let timeout = Duration::from_millis(config.provider_timeout_ms);
        let mut client = Self::new(cache).with_timeout(timeout);

        if let Some(pinata) = config.pinata.as_ref().filter(|c| c.is_configured()) {
            match PinataProvider::new(pinata, timeout) {
                Ok(p) => client = client.with_provider(Arc::new(p)),
                Err(e) => warn!(error = %e, "pinata provider disabled"),
            }
        }
        if let Some(ipfs) = config.ipfs_api.as_ref().filter(|c| c.is_configured()) {
            match IpfsApiProvider::new(ipfs, timeout) {
                Ok(p) => client = client.with_provider(Arc::new(p)),
                Err(e) => warn!(error = %e, "IPFS API provider disabled"),
            }
        }

        info!(
            providers = ?client.provider_names(),
            timeout_ms = config.provider_timeout_ms,
            "content store client ready"
        );
        client
    }

    /// Append a provider to the end of the failover order.
    pub fn with_provider(mut self, provider: Arc<dyn ContentProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `true` when at least one remote provider is configured.
    pub fn is_available(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn cache(&self) -> &Arc<dyn LocalCache> {
        &self.cache
    }

    /// Upload `data` under the logical `name`.
    ///
    /// Never fails: if no provider accepts the blob it is cached locally and
    /// a [`ContentRef::LocalOnly`] key derived from the bytes is returned.
    pub async fn upload(&self, data: &[u8], name: &str, kind: LocalKind) -> UploadResult {
        for provider in &self.providers {
            debug!(provider = provider.name(), name, size = data.len(), "uploading");
            match tokio::time::timeout(self.timeout, provider.upload(data, name)).await {
                Ok(Ok(receipt)) => {
                    return UploadResult {
                        content: ContentRef::Remote { hash: receipt.hash },
                        url: Some(receipt.url),
                        size: receipt.size,
                        provider: Some(provider.name().to_string()),
                    };
                }
                Ok(Err(e)) => warn!(provider = provider.name(), name, error = %e, "upload failed"),
                Err(_) => warn!(
                    provider = provider.name(),
                    name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "upload timed out"
                ),
            }
        }

        let content = FallbackKeys::content_ref(kind, data);
        if self.is_available() {
            warn!(name, key = %content, "all providers failed; stored under fallback key");
        } else {
            debug!(name, key = %content, "no providers configured; stored under fallback key");
        }
        if let Err(e) = self.cache.set(&keys::content(content.as_str()), data) {
            warn!(key = %content, error = %e, "failed to cache fallback content");
        }
        UploadResult {
            content,
            url: None,
            size: data.len() as u64,
            provider: None,
        }
    }

    /// Drop the cached blob behind a local-only ref that nothing points at
    /// any more. Returns `true` if a blob was removed.
    ///
    /// Remote refs are left alone: their content lives with the providers.
    pub fn discard(&self, content: &ContentRef) -> bool {
        if !content.is_local_only() {
            return false;
        }
        match self.cache.remove(&keys::content(content.as_str())) {
            Ok(removed) => {
                if removed {
                    debug!(key = %content, "discarded superseded local content");
                }
                removed
            }
            Err(e) => {
                warn!(key = %content, error = %e, "failed to discard local content");
                false
            }
        }
    }

    /// Fetch the content behind `content`.
    ///
    /// Remote refs are tried against each provider in order, then against
    /// the local content cache. Local-only refs are read from the cache
    /// alone. Fails with `ContentUnavailable` when every source misses.
    pub async fn resolve(&self, content: &ContentRef) -> StoreResult<Vec<u8>> {
        if let ContentRef::Remote { hash } = content {
            for provider in &self.providers {
                match tokio::time::timeout(self.timeout, provider.resolve(hash)).await {
                    Ok(Ok(data)) => return Ok(data),
                    Ok(Err(e)) => {
                        debug!(provider = provider.name(), %hash, error = %e, "resolve failed")
                    }
                    Err(_) => debug!(provider = provider.name(), %hash, "resolve timed out"),
                }
            }
        }

        match self.cache.get(&keys::content(content.as_str())) {
            Ok(Some(data)) => Ok(data),
            Ok(None) => Err(StoreError::ContentUnavailable(content.to_string())),
            Err(e) => {
                warn!(content = %content, error = %e, "cache read failed");
                Err(StoreError::ContentUnavailable(content.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for ContentStoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStoreClient")
            .field("providers", &self.provider_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}
