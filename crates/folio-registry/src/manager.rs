//! Loading, mutating, and persisting the registry.
//!
//! [`RegistryManager`] owns the in-memory registry for the lifetime of the
//! process. The first call that needs the registry loads it; every upsert
//! then re-uploads the whole document through the content store and records
//! the resulting ref as the new pointer.
//!
//! Concurrent upserts are applied to the in-memory registry one at a time,
//! but persistence runs outside the lock. If two persists race, whichever
//! finishes last sets the pointer, which may then reference the older
//! snapshot. The in-memory registry is still complete and the next upsert
//! persists it in full. This is accepted for a single-user client.
//!
//! Local-only blobs left unreferenced by an upsert are removed from the
//! cache: the previous registry snapshot once the pointer has moved, and the
//! replaced document of an entity. Offline publishing therefore keeps one
//! blob per live entry instead of one per publish.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use folio_store::{keys, ContentStoreClient, LocalCache};
use folio_types::{ContentRef, LocalKind, ProofId, WalletAddress};

use crate::error::Result;
use crate::types::{FreelancerEntry, ProofEntry, Registry, RegistryStats};

const REGISTRY_BLOB_NAME: &str = "folio-registry.json";

/// Where the in-memory registry came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// Resolved through the content store from the cached or bootstrap pointer.
    Pointer,
    /// Read from the local copy written at the last persist.
    LocalCopy,
    /// Nothing usable was found; a new empty registry was created.
    Empty,
}

/// Result of an upsert.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// `true` if a new entry was appended rather than replaced.
    pub inserted: bool,
    /// The ref the registry was persisted under.
    pub pointer: ContentRef,
    /// `false` if no provider accepted the registry and it lives in the
    /// local cache only.
    pub persisted_remotely: bool,
}

struct Loaded {
    registry: Registry,
    source: LoadSource,
}

/// Owner of the registry.
pub struct RegistryManager {
    client: Arc<ContentStoreClient>,
    bootstrap: Option<ContentRef>,
    state: Mutex<Option<Loaded>>,
    pointer: RwLock<Option<ContentRef>>,
}

impl RegistryManager {
    pub fn new(client: Arc<ContentStoreClient>) -> Self {
        Self {
            client,
            bootstrap: None,
            state: Mutex::new(None),
            pointer: RwLock::new(None),
        }
    }

    /// Pointer to try when none is cached locally, e.g. a registry shared by
    /// other clients.
    pub fn with_bootstrap(mut self, pointer: ContentRef) -> Self {
        self.bootstrap = Some(pointer);
        self
    }

    fn cache(&self) -> &Arc<dyn LocalCache> {
        self.client.cache()
    }

    /// Load the registry if it has not been loaded yet.
    pub async fn ensure(&self) -> LoadSource {
        self.with_registry(|_, source| source).await
    }

    /// `true` once the registry is held in memory.
    pub async fn is_loaded(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// The ref the registry is currently stored under, if it has ever been
    /// persisted or loaded through a pointer.
    pub fn pointer(&self) -> Option<ContentRef> {
        self.pointer.read().expect("lock poisoned").clone()
    }

    pub async fn stats(&self) -> RegistryStats {
        self.with_registry(|r, _| r.stats()).await
    }

    /// A copy of the current registry.
    pub async fn snapshot(&self) -> Registry {
        self.with_registry(|r, _| r.clone()).await
    }

    pub async fn freelancer(&self, wallet: &WalletAddress) -> Option<FreelancerEntry> {
        self.with_registry(|r, _| r.freelancer(wallet).cloned()).await
    }

    pub async fn proof(&self, id: &ProofId) -> Option<ProofEntry> {
        self.with_registry(|r, _| r.proof(id).cloned()).await
    }

    pub async fn proofs_for_wallet(&self, wallet: &WalletAddress) -> Vec<ProofEntry> {
        self.with_registry(|r, _| r.proofs_for_wallet(wallet).cloned().collect())
            .await
    }

    /// Record `content` as the current profile of `wallet` and persist.
    pub async fn upsert_freelancer(
        &self,
        wallet: WalletAddress,
        content: ContentRef,
    ) -> Result<UpsertOutcome> {
        let (inserted, superseded, snapshot) = self
            .with_registry(|r, _| {
                let superseded = r
                    .freelancer(&wallet)
                    .map(|e| e.content.clone())
                    .filter(|old| *old != content);
                let inserted = r.upsert_freelancer(wallet, content);
                (inserted, superseded, r.clone())
            })
            .await;
        let outcome = self.persist(&snapshot, inserted).await?;
        for old in superseded {
            self.client.discard(&old);
        }
        Ok(outcome)
    }

    /// Record the refs of proof `id` and persist.
    pub async fn upsert_proof(
        &self,
        id: ProofId,
        wallet: WalletAddress,
        content: ContentRef,
        metadata: ContentRef,
    ) -> Result<UpsertOutcome> {
        let (inserted, superseded, snapshot) = self
            .with_registry(|r, _| {
                let superseded: Vec<ContentRef> = match r.proof(&id) {
                    Some(old) => [&old.content, &old.metadata]
                        .into_iter()
                        .filter(|old| **old != content && **old != metadata)
                        .cloned()
                        .collect(),
                    None => Vec::new(),
                };
                let inserted = r.upsert_proof(id, wallet, content, metadata);
                (inserted, superseded, r.clone())
            })
            .await;
        let outcome = self.persist(&snapshot, inserted).await?;
        for old in &superseded {
            self.client.discard(old);
        }
        Ok(outcome)
    }

    async fn with_registry<R>(&self, f: impl FnOnce(&mut Registry, LoadSource) -> R) -> R {
        let mut state = self.state.lock().await;
        let loaded = match state.take() {
            Some(loaded) => loaded,
            None => self.load().await,
        };
        let loaded = state.insert(loaded);
        f(&mut loaded.registry, loaded.source)
    }

    async fn load(&self) -> Loaded {
        let cached_pointer = self.cached_pointer();
        let from_cache = cached_pointer.is_some();
        let candidate = cached_pointer.or_else(|| self.bootstrap.clone());

        if let Some(pointer) = candidate {
            match self.client.resolve(&pointer).await {
                Ok(data) => match Registry::from_bytes(&data) {
                    Ok(registry) => {
                        info!(
                            pointer = %pointer,
                            freelancers = registry.total_freelancers(),
                            proofs = registry.total_proofs(),
                            "registry loaded"
                        );
                        self.set_pointer(pointer);
                        return Loaded {
                            registry,
                            source: LoadSource::Pointer,
                        };
                    }
                    Err(e) => warn!(pointer = %pointer, error = %e, "registry document unreadable"),
                },
                Err(e) => warn!(pointer = %pointer, error = %e, "registry pointer unresolvable"),
            }
            if from_cache {
                self.set_pointer(pointer);
            }
        }

        match self.cache().get(keys::REGISTRY_LATEST) {
            Ok(Some(data)) => match Registry::from_bytes(&data) {
                Ok(registry) => {
                    info!(
                        freelancers = registry.total_freelancers(),
                        proofs = registry.total_proofs(),
                        "registry loaded from local copy"
                    );
                    return Loaded {
                        registry,
                        source: LoadSource::LocalCopy,
                    };
                }
                Err(e) => warn!(error = %e, "local registry copy unreadable"),
            },
            Ok(None) => debug!("no local registry copy"),
            Err(e) => warn!(error = %e, "local registry copy unreadable"),
        }

        info!("starting with an empty registry");
        Loaded {
            registry: Registry::new(),
            source: LoadSource::Empty,
        }
    }

    /// Upload the snapshot, then cache it and its pointer.
    ///
    /// Provider and cache failures are logged, never returned: the in-memory
    /// registry stays authoritative for the rest of the process.
    async fn persist(&self, snapshot: &Registry, inserted: bool) -> Result<UpsertOutcome> {
        let bytes = snapshot.to_bytes()?;
        let upload = self
            .client
            .upload(&bytes, REGISTRY_BLOB_NAME, LocalKind::Registry)
            .await;

        // The local copy, the cached pointer and the in-memory pointer move
        // together so a reload never pairs a pointer with another snapshot.
        let previous = {
            let mut pointer = self.pointer.write().expect("lock poisoned");
            if let Err(e) = self.cache().set(keys::REGISTRY_LATEST, &bytes) {
                warn!(error = %e, "failed to cache registry copy");
            }
            match serde_json::to_vec(&upload.content) {
                Ok(encoded) => {
                    if let Err(e) = self.cache().set(keys::REGISTRY_POINTER, &encoded) {
                        warn!(error = %e, "failed to cache registry pointer");
                    }
                }
                Err(e) => warn!(error = %e, "failed to encode registry pointer"),
            }
            pointer.replace(upload.content.clone())
        };
        if let Some(previous) = previous.filter(|p| *p != upload.content) {
            self.client.discard(&previous);
        }

        let persisted_remotely = upload.content.is_remote();
        if !persisted_remotely && self.client.is_available() {
            warn!(
                pointer = %upload.content,
                "registry persist failed on every provider; kept in local cache only"
            );
        }
        debug!(
            pointer = %upload.content,
            freelancers = snapshot.total_freelancers(),
            proofs = snapshot.total_proofs(),
            "registry persisted"
        );

        Ok(UpsertOutcome {
            inserted,
            pointer: upload.content,
            persisted_remotely,
        })
    }

    fn cached_pointer(&self) -> Option<ContentRef> {
        let data = match self.cache().get(keys::REGISTRY_POINTER) {
            Ok(data) => data?,
            Err(e) => {
                warn!(error = %e, "registry pointer unreadable");
                return None;
            }
        };
        match serde_json::from_slice(&data) {
            Ok(pointer) => Some(pointer),
            Err(e) => {
                warn!(error = %e, "cached registry pointer is malformed");
                None
            }
        }
    }

    fn set_pointer(&self, pointer: ContentRef) {
        *self.pointer.write().expect("lock poisoned") = Some(pointer);
    }
}

impl std::fmt::Debug for RegistryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryManager")
            .field("pointer", &self.pointer())
            .field("bootstrap", &self.bootstrap)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_store::{MemoryCache, MemoryProvider};

    fn wallet(s: &str) -> WalletAddress {
        WalletAddress::new(s).unwrap()
    }

    fn pid(s: &str) -> ProofId {
        ProofId::new(s).unwrap()
    }

    fn remote(s: &str) -> ContentRef {
        ContentRef::remote(s).unwrap()
    }

    fn offline_client(cache: Arc<MemoryCache>) -> Arc<ContentStoreClient> {
        Arc::new(ContentStoreClient::new(cache))
    }

    fn online_client(
        cache: Arc<MemoryCache>,
        provider: Arc<MemoryProvider>,
    ) -> Arc<ContentStoreClient> {
        Arc::new(ContentStoreClient::new(cache).with_provider(provider))
    }

    #[tokio::test]
    async fn first_use_creates_empty_registry() {
        let manager = RegistryManager::new(offline_client(Arc::new(MemoryCache::new())));
        assert!(!manager.is_loaded().await);
        assert_eq!(manager.ensure().await, LoadSource::Empty);
        assert!(manager.is_loaded().await);
        let stats = manager.stats().await;
        assert_eq!(stats.total_freelancers, 0);
        assert_eq!(stats.total_proofs, 0);
        assert_eq!(manager.pointer(), None);
    }

    #[tokio::test]
    async fn upsert_persists_through_provider() {
        let cache = Arc::new(MemoryCache::new());
        let provider = Arc::new(MemoryProvider::new());
        let manager = RegistryManager::new(online_client(cache.clone(), provider.clone()));

        let outcome = manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap();
        assert!(outcome.inserted);
        assert!(outcome.persisted_remotely);
        assert!(outcome.pointer.is_remote());
        assert_eq!(manager.pointer(), Some(outcome.pointer.clone()));
        assert!(provider.contains(outcome.pointer.as_str()));
        assert!(cache.contains(keys::REGISTRY_LATEST).unwrap());
        assert!(cache.contains(keys::REGISTRY_POINTER).unwrap());
    }

    #[tokio::test]
    async fn upsert_freelancer_twice_is_idempotent() {
        let manager = RegistryManager::new(offline_client(Arc::new(MemoryCache::new())));
        let first = manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap();
        let second = manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap();

        assert!(first.inserted);
        assert!(!second.inserted);
        let snapshot = manager.snapshot().await;
        assert_eq!(snapshot.total_freelancers(), 1);
        assert_eq!(snapshot.freelancers().len(), 1);
        assert_eq!(
            manager.freelancer(&wallet("W1")).await.unwrap().content,
            remote("QmA")
        );
    }

    #[tokio::test]
    async fn persist_failure_keeps_state_and_local_copy() {
        let cache = Arc::new(MemoryCache::new());
        let provider = Arc::new(MemoryProvider::new());
        provider.set_online(false);
        let manager = RegistryManager::new(online_client(cache.clone(), provider));

        let outcome = manager
            .upsert_proof(pid("P1"), wallet("W1"), remote("QmP"), remote("QmM"))
            .await
            .unwrap();
        assert!(!outcome.persisted_remotely);
        assert!(outcome.pointer.is_local_only());
        assert!(outcome.pointer.as_str().starts_with("registry_"));
        assert_eq!(manager.stats().await.total_proofs, 1);
        assert!(cache.contains(keys::REGISTRY_LATEST).unwrap());
    }

    #[tokio::test]
    async fn offline_upserts_keep_one_registry_blob() {
        let cache = Arc::new(MemoryCache::new());
        let manager = RegistryManager::new(offline_client(cache.clone()));
        for i in 0..20 {
            manager
                .upsert_freelancer(wallet("W1"), remote(&format!("Qm{i}")))
                .await
                .unwrap();
        }
        let blobs = cache.keys(&keys::content("registry_")).unwrap();
        assert_eq!(blobs, vec![keys::content(manager.pointer().unwrap().as_str())]);

        // A reopened manager takes over from the cached pointer.
        let reopened = RegistryManager::new(offline_client(cache.clone()));
        reopened.upsert_freelancer(wallet("W2"), remote("QmB")).await.unwrap();
        let blobs = cache.keys(&keys::content("registry_")).unwrap();
        assert_eq!(blobs, vec![keys::content(reopened.pointer().unwrap().as_str())]);
    }

    #[tokio::test]
    async fn replaced_local_only_entries_are_discarded() {
        let cache = Arc::new(MemoryCache::new());
        let client = offline_client(cache.clone());
        let stored = |content: &ContentRef| {
            cache.contains(&keys::content(content.as_str())).unwrap()
        };

        let v1 = client.upload(b"profile v1", "p", LocalKind::Freelancer).await.content;
        let v2 = client.upload(b"profile v2", "p", LocalKind::Freelancer).await.content;
        let manager = RegistryManager::new(client.clone());
        manager.upsert_freelancer(wallet("W1"), v1.clone()).await.unwrap();
        manager.upsert_freelancer(wallet("W1"), v1.clone()).await.unwrap();
        assert!(stored(&v1));
        manager.upsert_freelancer(wallet("W1"), v2.clone()).await.unwrap();
        assert!(!stored(&v1));
        assert!(stored(&v2));

        let meta = client.upload(b"meta", "m", LocalKind::Metadata).await.content;
        let p1 = client.upload(b"proof v1", "p", LocalKind::Proof).await.content;
        let p2 = client.upload(b"proof v2", "p", LocalKind::Proof).await.content;
        manager
            .upsert_proof(pid("P1"), wallet("W1"), p1.clone(), meta.clone())
            .await
            .unwrap();
        manager
            .upsert_proof(pid("P1"), wallet("W1"), p2.clone(), meta.clone())
            .await
            .unwrap();
        assert!(!stored(&p1));
        assert!(stored(&p2));
        assert!(stored(&meta));
    }

    #[tokio::test]
    async fn replaced_remote_entries_are_left_alone() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(&keys::content("QmOld"), b"copy").unwrap();
        let manager = RegistryManager::new(offline_client(cache.clone()));
        manager.upsert_freelancer(wallet("W1"), remote("QmOld")).await.unwrap();
        manager.upsert_freelancer(wallet("W1"), remote("QmNew")).await.unwrap();
        assert!(cache.contains(&keys::content("QmOld")).unwrap());
    }

    #[tokio::test]
    async fn reload_follows_cached_pointer() {
        let cache = Arc::new(MemoryCache::new());
        let provider = Arc::new(MemoryProvider::new());
        let pointer = {
            let manager = RegistryManager::new(online_client(cache.clone(), provider.clone()));
            manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap();
            manager.upsert_freelancer(wallet("W2"), remote("QmB")).await.unwrap().pointer
        };

        let reopened = RegistryManager::new(online_client(cache, provider));
        assert_eq!(reopened.ensure().await, LoadSource::Pointer);
        assert_eq!(reopened.pointer(), Some(pointer));
        assert_eq!(reopened.stats().await.total_freelancers, 2);
    }

    #[tokio::test]
    async fn reload_with_provider_down_uses_local_copy() {
        let cache = Arc::new(MemoryCache::new());
        let provider = Arc::new(MemoryProvider::new());
        let pointer = {
            let manager = RegistryManager::new(online_client(cache.clone(), provider.clone()));
            manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap().pointer
        };
        provider.set_online(false);

        let reopened = RegistryManager::new(online_client(cache, provider));
        assert_eq!(reopened.ensure().await, LoadSource::LocalCopy);
        // The cached pointer is still where the registry lives remotely.
        assert_eq!(reopened.pointer(), Some(pointer));
        assert!(reopened.freelancer(&wallet("W1")).await.is_some());
    }

    #[tokio::test]
    async fn local_only_pointer_reloads_offline() {
        let cache = Arc::new(MemoryCache::new());
        {
            let manager = RegistryManager::new(offline_client(cache.clone()));
            manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap();
        }
        let reopened = RegistryManager::new(offline_client(cache));
        assert_eq!(reopened.ensure().await, LoadSource::Pointer);
        assert!(reopened.pointer().unwrap().is_local_only());
    }

    #[tokio::test]
    async fn bootstrap_pointer_joins_shared_registry() {
        let shared = Arc::new(MemoryProvider::new());
        let pointer = {
            let manager =
                RegistryManager::new(online_client(Arc::new(MemoryCache::new()), shared.clone()));
            manager.upsert_freelancer(wallet("W1"), remote("QmA")).await.unwrap().pointer
        };

        let fresh = RegistryManager::new(online_client(Arc::new(MemoryCache::new()), shared))
            .with_bootstrap(pointer.clone());
        assert_eq!(fresh.ensure().await, LoadSource::Pointer);
        assert_eq!(fresh.pointer(), Some(pointer));
        assert_eq!(fresh.stats().await.total_freelancers, 1);
    }

    #[tokio::test]
    async fn unresolvable_bootstrap_starts_empty() {
        let manager = RegistryManager::new(offline_client(Arc::new(MemoryCache::new())))
            .with_bootstrap(remote("QmNowhere"));
        assert_eq!(manager.ensure().await, LoadSource::Empty);
        assert_eq!(manager.pointer(), None);
    }

    #[tokio::test]
    async fn corrupt_local_state_starts_empty() {
        let cache = Arc::new(MemoryCache::new());
        cache.set(keys::REGISTRY_POINTER, b"not json").unwrap();
        cache.set(keys::REGISTRY_LATEST, b"{broken").unwrap();
        let manager = RegistryManager::new(offline_client(cache));
        assert_eq!(manager.ensure().await, LoadSource::Empty);
    }

    #[tokio::test]
    async fn concurrent_upserts_are_all_kept_in_memory() {
        let manager = Arc::new(RegistryManager::new(offline_client(Arc::new(MemoryCache::new()))));
        let a = manager.upsert_freelancer(wallet("W1"), remote("QmA"));
        let b = manager.upsert_freelancer(wallet("W2"), remote("QmB"));
        let c = manager.upsert_proof(pid("P1"), wallet("W1"), remote("QmP"), remote("QmM"));
        let (a, b, c) = tokio::join!(a, b, c);
        a.unwrap();
        b.unwrap();
        c.unwrap();

        let stats = manager.stats().await;
        assert_eq!(stats.total_freelancers, 2);
        assert_eq!(stats.total_proofs, 1);
    }

    #[tokio::test]
    async fn proofs_for_wallet_filters() {
        let manager = RegistryManager::new(offline_client(Arc::new(MemoryCache::new())));
        manager
            .upsert_proof(pid("P1"), wallet("W1"), remote("Qm1"), remote("QmM1"))
            .await
            .unwrap();
        manager
            .upsert_proof(pid("P2"), wallet("W2"), remote("Qm2"), remote("QmM2"))
            .await
            .unwrap();
        let w1 = manager.proofs_for_wallet(&wallet("W1")).await;
        assert_eq!(w1.len(), 1);
        assert_eq!(w1[0].id, pid("P1"));
        assert!(manager.proof(&pid("P2")).await.is_some());
    }
}
