use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use folio_crypto::ContentHasher;
use folio_types::LocalKind;

use crate::error::{StoreError, StoreResult};
use crate::traits::{ContentProvider, ProviderReceipt};

/// In-memory, content-addressed provider.
///
/// Intended for tests and embedding. Blobs are held in a `HashMap` keyed by
/// a BLAKE3-derived hash. The provider can be switched offline to simulate
/// an outage; while offline every call fails with `ProviderUnavailable`.
/// Share one instance between clients (via `Arc`) to model a common remote.
pub struct MemoryProvider {
    name: String,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    online: AtomicBool,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blobs: RwLock::new(HashMap::new()),
            online: AtomicBool::new(true),
        }
    }

    /// Content hash this provider assigns to `data`.
    pub fn hash_of(data: &[u8]) -> String {
        format!("mem{}", ContentHasher::for_kind(LocalKind::Blob).hash_hex(data))
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    pub fn contains(&self, hash: &str) -> bool {
        self.blobs.read().expect("lock poisoned").contains_key(hash)
    }

    /// Drop a blob, simulating content the remote no longer serves.
    pub fn forget(&self, hash: &str) -> bool {
        self.blobs
            .write()
            .expect("lock poisoned")
            .remove(hash)
            .is_some()
    }

    fn check_online(&self) -> StoreResult<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(StoreError::provider(&self.name, "offline"))
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentProvider for MemoryProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upload(&self, data: &[u8], _name: &str) -> StoreResult<ProviderReceipt> {
        self.check_online()?;
        let hash = Self::hash_of(data);
        // Idempotent: the same content always maps to the same hash.
        self.blobs
            .write()
            .expect("lock poisoned")
            .entry(hash.clone())
            .or_insert_with(|| data.to_vec());
        Ok(ProviderReceipt {
            url: format!("memory://{hash}"),
            hash,
            size: data.len() as u64,
        })
    }

    async fn resolve(&self, hash: &str) -> StoreResult<Vec<u8>> {
        self.check_online()?;
        self.blobs
            .read()
            .expect("lock poisoned")
            .get(hash)
            .cloned()
            .ok_or_else(|| StoreError::provider(&self.name, format!("{hash} not found")))
    }
}

impl std::fmt::Debug for MemoryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("name", &self.name)
            .field("blob_count", &self.len())
            .field("online", &self.is_online())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_and_resolve() {
        let provider = MemoryProvider::new();
        let receipt = provider.upload(b"hello", "hello.txt").await.unwrap();
        assert_eq!(receipt.hash, MemoryProvider::hash_of(b"hello"));
        assert_eq!(receipt.size, 5);
        assert!(receipt.url.ends_with(&receipt.hash));
        assert_eq!(provider.resolve(&receipt.hash).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn same_content_same_hash() {
        let provider = MemoryProvider::new();
        let a = provider.upload(b"same", "a").await.unwrap();
        let b = provider.upload(b"same", "b").await.unwrap();
        assert_eq!(a.hash, b.hash);
        assert_eq!(provider.len(), 1);
    }

    #[tokio::test]
    async fn offline_fails_both_ways() {
        let provider = MemoryProvider::new();
        let receipt = provider.upload(b"data", "d").await.unwrap();
        provider.set_online(false);
        assert!(matches!(
            provider.upload(b"more", "m").await,
            Err(StoreError::ProviderUnavailable { .. })
        ));
        assert!(provider.resolve(&receipt.hash).await.is_err());
        provider.set_online(true);
        assert!(provider.resolve(&receipt.hash).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_hash_is_unavailable() {
        let provider = MemoryProvider::named("mirror");
        let err = provider.resolve("memdeadbeef").await.unwrap_err();
        assert!(err.to_string().contains("mirror"));
    }

    #[tokio::test]
    async fn forget_removes_blob() {
        let provider = MemoryProvider::new();
        let receipt = provider.upload(b"gone soon", "g").await.unwrap();
        assert!(provider.forget(&receipt.hash));
        assert!(!provider.contains(&receipt.hash));
        assert!(provider.resolve(&receipt.hash).await.is_err());
    }
}
