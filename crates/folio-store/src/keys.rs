//! Local cache key layout.
//!
//! Every entity copy and the registry pointer occupy their own key, so no
//! write ever needs to touch two keys at once.

use folio_types::{ProofId, WalletAddress};

/// The ref the registry was last persisted under.
pub const REGISTRY_POINTER: &str = "registry/pointer";
/// The last persisted registry document.
pub const REGISTRY_LATEST: &str = "registry/latest";

/// Blob stored under a content hash or fallback key.
pub fn content(hash_or_key: &str) -> String {
    format!("content/{hash_or_key}")
}

/// Local copy of a freelancer profile document.
pub fn freelancer(wallet: &WalletAddress) -> String {
    format!("freelancer/{wallet}")
}

/// Local copy of a full proof document.
pub fn proof(id: &ProofId) -> String {
    format!("proof/{id}")
}

/// Local copy of a proof metadata document.
pub fn proof_metadata(id: &ProofId) -> String {
    format!("proof-metadata/{id}")
}
