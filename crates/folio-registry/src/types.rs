//! The registry document and its entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use folio_types::{ContentRef, ProofId, WalletAddress};

use crate::error::{RegistryError, Result};

/// Schema version written into new registries.
pub const REGISTRY_VERSION: &str = "1.0.0";

/// Registry entry for one freelancer profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerEntry {
    pub wallet_address: WalletAddress,
    #[serde(rename = "contentHash")]
    pub content: ContentRef,
    pub last_updated: DateTime<Utc>,
}

/// Registry entry for one proof record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofEntry {
    pub id: ProofId,
    pub wallet_address: WalletAddress,
    #[serde(rename = "contentHash")]
    pub content: ContentRef,
    #[serde(rename = "metadataHash")]
    pub metadata: ContentRef,
    pub last_updated: DateTime<Utc>,
}

/// Summary counters of a registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_freelancers: usize,
    pub total_proofs: usize,
    pub last_updated: DateTime<Utc>,
}

/// Index of every published profile and proof.
///
/// Invariants, upheld by every method:
/// - at most one freelancer entry per wallet address;
/// - at most one proof entry per proof id;
/// - `total_freelancers == freelancers.len()` and
///   `total_proofs == proofs.len()`.
///
/// Fields are private so the invariants cannot be bypassed. Later writes
/// always win; `last_updated` is informational.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registry {
    version: String,
    last_updated: DateTime<Utc>,
    total_freelancers: usize,
    total_proofs: usize,
    freelancers: Vec<FreelancerEntry>,
    proofs: Vec<ProofEntry>,
}

impl Registry {
    /// An empty registry at the current schema version.
    pub fn new() -> Self {
        Self {
            version: REGISTRY_VERSION.to_string(),
            last_updated: Utc::now(),
            total_freelancers: 0,
            total_proofs: 0,
            freelancers: Vec::new(),
            proofs: Vec::new(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn total_freelancers(&self) -> usize {
        self.total_freelancers
    }

    pub fn total_proofs(&self) -> usize {
        self.total_proofs
    }

    pub fn freelancers(&self) -> &[FreelancerEntry] {
        &self.freelancers
    }

    pub fn proofs(&self) -> &[ProofEntry] {
        &self.proofs
    }

    pub fn freelancer(&self, wallet: &WalletAddress) -> Option<&FreelancerEntry> {
        self.freelancers.iter().find(|e| &e.wallet_address == wallet)
    }

    pub fn proof(&self, id: &ProofId) -> Option<&ProofEntry> {
        self.proofs.iter().find(|e| &e.id == id)
    }

    pub fn proofs_for_wallet<'a>(
        &'a self,
        wallet: &'a WalletAddress,
    ) -> impl Iterator<Item = &'a ProofEntry> + 'a {
        self.proofs.iter().filter(move |e| &e.wallet_address == wallet)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_freelancers: self.total_freelancers,
            total_proofs: self.total_proofs,
            last_updated: self.last_updated,
        }
    }

    /// Record `content` as the current profile for `wallet`.
    ///
    /// Replaces the existing entry in place or appends a new one. Returns
    /// `true` if an entry was appended.
    pub fn upsert_freelancer(&mut self, wallet: WalletAddress, content: ContentRef) -> bool {
        let now = Utc::now();
        let entry = FreelancerEntry {
            wallet_address: wallet,
            content,
            last_updated: now,
        };
        let inserted = match self
            .freelancers
            .iter_mut()
            .find(|e| e.wallet_address == entry.wallet_address)
        {
            Some(existing) => {
                *existing = entry;
                false
            }
            None => {
                self.freelancers.push(entry);
                true
            }
        };
        self.total_freelancers = self.freelancers.len();
        self.last_updated = now;
        inserted
    }

    /// Record the proof and metadata refs for proof `id`.
    ///
    /// Replaces the existing entry in place or appends a new one. Returns
    /// `true` if an entry was appended.
    pub fn upsert_proof(
        &mut self,
        id: ProofId,
        wallet: WalletAddress,
        content: ContentRef,
        metadata: ContentRef,
    ) -> bool {
        let now = Utc::now();
        let entry = ProofEntry {
            id,
            wallet_address: wallet,
            content,
            metadata,
            last_updated: now,
        };
        let inserted = match self.proofs.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                *existing = entry;
                false
            }
            None => {
                self.proofs.push(entry);
                true
            }
        };
        self.total_proofs = self.proofs.len();
        self.last_updated = now;
        inserted
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    /// Decode a stored registry, repairing invariant violations.
    ///
    /// Documents written by other clients are not trusted to be well-formed:
    /// duplicate keys collapse onto the first position with the last value,
    /// and the totals are recomputed from the lists.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut registry: Registry = serde_json::from_slice(data)
            .map_err(|e| RegistryError::Deserialization(e.to_string()))?;
        registry.normalize();
        Ok(registry)
    }

    fn normalize(&mut self) {
        let (freelancer_count, proof_count) = (self.freelancers.len(), self.proofs.len());

        let mut freelancers: Vec<FreelancerEntry> = Vec::with_capacity(freelancer_count);
        for entry in self.freelancers.drain(..) {
            match freelancers
                .iter_mut()
                .find(|e| e.wallet_address == entry.wallet_address)
            {
                Some(existing) => *existing = entry,
                None => freelancers.push(entry),
            }
        }
        let mut proofs: Vec<ProofEntry> = Vec::with_capacity(proof_count);
        for entry in self.proofs.drain(..) {
            match proofs.iter_mut().find(|e| e.id == entry.id) {
                Some(existing) => *existing = entry,
                None => proofs.push(entry),
            }
        }

        if freelancers.len() != freelancer_count
            || proofs.len() != proof_count
            || self.total_freelancers != freelancers.len()
            || self.total_proofs != proofs.len()
        {
            warn!(
                stored_freelancers = self.total_freelancers,
                stored_proofs = self.total_proofs,
                freelancers = freelancers.len(),
                proofs = proofs.len(),
                "repaired inconsistent registry document"
            );
        }

        self.total_freelancers = freelancers.len();
        self.total_proofs = proofs.len();
        self.freelancers = freelancers;
        self.proofs = proofs;
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
