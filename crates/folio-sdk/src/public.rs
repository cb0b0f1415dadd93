//! The public data facade.
//!
//! [`PublicData`] is the single entry point for application code. Publishing
//! uploads the entity, records its ref in the registry, and keeps a local
//! copy. Loading walks the registry and reads each entity from wherever it is
//! still available, skipping the ones that are not.

use std::sync::Arc;

use tracing::{debug, info, warn};

use folio_codec::{validate, EntityCodec};
use folio_registry::{RegistryManager, RegistryStats};
use folio_store::{keys, ContentStoreClient, FileCache, LocalCache, MemoryCache};
use folio_types::{
    Attachment, ContentRef, FreelancerProfile, LocalKind, ProofId, ProofRecord, WalletAddress,
};

use crate::config::FolioConfig;
use crate::error::{SdkError, SdkResult};

/// Refs returned by [`PublicData::publish_proof`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublishedProof {
    pub proof: ContentRef,
    pub metadata: ContentRef,
}

impl PublishedProof {
    /// `true` if either document only exists in the local cache.
    pub fn is_local_only(&self) -> bool {
        self.proof.is_local_only() || self.metadata.is_local_only()
    }
}

/// Publish and load freelancer profiles and proofs.
///
/// Every operation completes without remote providers: publishing degrades
/// to local-only refs and loading reads local copies. Only structurally
/// invalid input is reported as an error.
pub struct PublicData {
    client: Arc<ContentStoreClient>,
    registry: Arc<RegistryManager>,
}

impl PublicData {
    /// Wire a facade from existing parts. `registry` must share `client`.
    pub fn new(client: Arc<ContentStoreClient>, registry: Arc<RegistryManager>) -> Self {
        Self { client, registry }
    }

    /// Build cache, providers, client and registry from `config`, then load
    /// the registry.
    pub async fn open(config: &FolioConfig) -> SdkResult<Self> {
        let cache: Arc<dyn LocalCache> = match &config.cache_dir {
            Some(dir) => Arc::new(FileCache::open(dir)?),
            None => Arc::new(MemoryCache::new()),
        };
        let client = Arc::new(ContentStoreClient::from_config(&config.store, cache));

        let mut registry = RegistryManager::new(client.clone());
        if let Some(pointer) = &config.registry_pointer {
            let pointer = ContentRef::classify(pointer)
                .map_err(|e| SdkError::Config(format!("registry_pointer: {e}")))?;
            registry = registry.with_bootstrap(pointer);
        }
        let registry = Arc::new(registry);
        let source = registry.ensure().await;

        info!(
            providers = ?client.provider_names(),
            persistent_cache = config.cache_dir.is_some(),
            registry = ?source,
            "public data opened"
        );
        Ok(Self::new(client, registry))
    }

    fn cache(&self) -> &Arc<dyn LocalCache> {
        self.client.cache()
    }

    pub fn is_remote_available(&self) -> bool {
        self.client.is_available()
    }

    pub async fn registry_stats(&self) -> RegistryStats {
        self.registry.stats().await
    }

    pub fn registry_pointer(&self) -> Option<ContentRef> {
        self.registry.pointer()
    }

    pub fn registry(&self) -> &Arc<RegistryManager> {
        &self.registry
    }

    /// Publish `profile` and return the ref it is stored under.
    pub async fn publish_profile(&self, profile: &FreelancerProfile) -> SdkResult<ContentRef> {
        let bytes = EntityCodec::encode_profile(profile)?;
        let wallet = &profile.wallet_address;

        let upload = self
            .client
            .upload(&bytes, &format!("freelancer-{wallet}.json"), LocalKind::Freelancer)
            .await;
        self.registry
            .upsert_freelancer(wallet.clone(), upload.content.clone())
            .await?;
        self.keep_copy(&keys::freelancer(wallet), &bytes);

        info!(wallet = %wallet, content = %upload.content, "profile published");
        Ok(upload.content)
    }

    /// Publish the metadata view of `proof`, then the full record pointing at
    /// it.
    pub async fn publish_proof(&self, proof: &ProofRecord) -> SdkResult<PublishedProof> {
        validate::validate_proof(proof)?;
        let metadata_bytes = EntityCodec::encode_metadata(&proof.metadata())?;

        let metadata = self
            .client
            .upload(
                &metadata_bytes,
                &format!("proof-metadata-{}.json", proof.id),
                LocalKind::Metadata,
            )
            .await
            .content;

        let proof_bytes = EntityCodec::encode_proof(proof, &metadata)?;
        let content = self
            .client
            .upload(&proof_bytes, &format!("proof-{}.json", proof.id), LocalKind::Proof)
            .await
            .content;

        self.registry
            .upsert_proof(
                proof.id.clone(),
                proof.wallet_address.clone(),
                content.clone(),
                metadata.clone(),
            )
            .await?;
        self.keep_copy(&keys::proof(&proof.id), &proof_bytes);
        self.keep_copy(&keys::proof_metadata(&proof.id), &metadata_bytes);

        info!(id = %proof.id, content = %content, metadata = %metadata, "proof published");
        Ok(PublishedProof {
            proof: content,
            metadata,
        })
    }

    /// Upload the bytes of `attachment` and set its content ref.
    pub async fn upload_attachment(
        &self,
        mut attachment: Attachment,
        data: &[u8],
    ) -> SdkResult<Attachment> {
        if attachment.name.trim().is_empty() {
            return Err(folio_codec::CodecError::MissingField {
                entity: "attachment",
                field: "name",
            }
            .into());
        }
        let upload = self
            .client
            .upload(data, &attachment.name, LocalKind::Blob)
            .await;
        debug!(name = %attachment.name, content = %upload.content, "attachment uploaded");
        attachment.content = Some(upload.content);
        attachment.size.get_or_insert(upload.size);
        Ok(attachment)
    }

    /// Every profile in the registry that can still be read.
    pub async fn load_all_profiles(&self) -> Vec<FreelancerProfile> {
        let snapshot = self.registry.snapshot().await;
        let mut profiles = Vec::with_capacity(snapshot.freelancers().len());
        for entry in snapshot.freelancers() {
            if let Some(profile) = self.read_profile(&entry.wallet_address, &entry.content).await {
                profiles.push(profile);
            }
        }
        profiles
    }

    /// Every proof in the registry that can still be read.
    pub async fn load_all_proofs(&self) -> Vec<ProofRecord> {
        let snapshot = self.registry.snapshot().await;
        let mut proofs = Vec::with_capacity(snapshot.proofs().len());
        for entry in snapshot.proofs() {
            if let Some(proof) = self.read_proof(&entry.id, &entry.content).await {
                proofs.push(proof);
            }
        }
        proofs
    }

    pub async fn load_profiles_for_wallet(&self, wallet: &WalletAddress) -> Vec<FreelancerProfile> {
        self.load_profile(wallet).await.into_iter().collect()
    }

    pub async fn load_proofs_for_wallet(&self, wallet: &WalletAddress) -> Vec<ProofRecord> {
        let mut proofs = Vec::new();
        for entry in self.registry.proofs_for_wallet(wallet).await {
            if let Some(proof) = self.read_proof(&entry.id, &entry.content).await {
                proofs.push(proof);
            }
        }
        proofs
    }

    pub async fn load_profile(&self, wallet: &WalletAddress) -> Option<FreelancerProfile> {
        let entry = self.registry.freelancer(wallet).await?;
        self.read_profile(&entry.wallet_address, &entry.content).await
    }

    pub async fn load_proof(&self, id: &ProofId) -> Option<ProofRecord> {
        let entry = self.registry.proof(id).await?;
        self.read_proof(&entry.id, &entry.content).await
    }

    async fn read_profile(
        &self,
        wallet: &WalletAddress,
        content: &ContentRef,
    ) -> Option<FreelancerProfile> {
        let data = self.fetch(content, &keys::freelancer(wallet)).await?;
        match EntityCodec::decode_profile(&data) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(
                    wallet = %wallet,
                    content = %content,
                    error = %e,
                    "skipping undecodable profile"
                );
                None
            }
        }
    }

    async fn read_proof(&self, id: &ProofId, content: &ContentRef) -> Option<ProofRecord> {
        let data = self.fetch(content, &keys::proof(id)).await?;
        match EntityCodec::decode_proof(&data) {
            Ok(doc) => Some(doc.proof),
            Err(e) => {
                warn!(id = %id, content = %content, error = %e, "skipping undecodable proof");
                None
            }
        }
    }

    /// Read an entity blob. Local-only refs go to the entity's local copy
    /// first; remote refs go to the content store first. Each falls back to
    /// the other source.
    async fn fetch(&self, content: &ContentRef, local_key: &str) -> Option<Vec<u8>> {
        if content.is_local_only() {
            if let Some(data) = self.local_copy(local_key) {
                return Some(data);
            }
        }
        match self.client.resolve(content).await {
            Ok(data) => return Some(data),
            Err(e) => debug!(content = %content, error = %e, "content store miss"),
        }
        if content.is_remote() {
            if let Some(data) = self.local_copy(local_key) {
                return Some(data);
            }
        }
        debug!(content = %content, key = local_key, "entity unavailable; skipped");
        None
    }

    fn local_copy(&self, key: &str) -> Option<Vec<u8>> {
        match self.cache().get(key) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "local copy unreadable");
                None
            }
        }
    }

    fn keep_copy(&self, key: &str, data: &[u8]) {
        if let Err(e) = self.cache().set(key, data) {
            warn!(key, error = %e, "failed to write local copy");
        }
    }
}

impl std::fmt::Debug for PublicData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicData")
            .field("client", &self.client)
            .field("registry", &self.registry)
            .finish()
    }
}
