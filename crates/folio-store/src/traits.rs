use async_trait::async_trait;

use crate::error::StoreResult;

/// What a provider reports for an accepted upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderReceipt {
    /// Content hash assigned by the provider (e.g. an IPFS CID).
    pub hash: String,
    /// URL the content can be fetched from.
    pub url: String,
    /// Size the provider reports for the stored content.
    pub size: u64,
}

/// A remote content-addressed store.
///
/// Implementations must satisfy these rules:
/// - Any failure (transport error, non-2xx status, malformed response) is
///   reported as `StoreError::ProviderUnavailable`, whatever the cause.
/// - `upload` never returns an empty hash.
/// - Implementations do not retry internally; the client owns the failover
///   order.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short name used in logs and upload results.
    fn name(&self) -> &str;

    /// Store `data` under the logical `name` and return its content hash.
    async fn upload(&self, data: &[u8], name: &str) -> StoreResult<ProviderReceipt>;

    /// Fetch the content stored under `hash`.
    async fn resolve(&self, hash: &str) -> StoreResult<Vec<u8>>;
}
