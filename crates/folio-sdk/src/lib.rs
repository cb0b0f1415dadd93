//! Public data layer for Folio.
//!
//! Application code talks to [`PublicData`] only. It publishes freelancer
//! profiles and proof-of-work records to content-addressed storage, indexes
//! them in a shared registry, and reads them back, staying usable when no
//! remote provider answers.
//!
//! ```no_run
//! # async fn demo() -> folio_sdk::SdkResult<()> {
//! use folio_sdk::{FolioConfig, FreelancerProfile, PublicData, WalletAddress};
//!
//! let config = FolioConfig::load("folio.toml")?.with_env_overrides();
//! let data = PublicData::open(&config).await?;
//!
//! let wallet = WalletAddress::new("0xabc")
//!     .map_err(|e| folio_sdk::SdkError::Config(e.to_string()))?;
//! let content = data.publish_profile(&FreelancerProfile::new(wallet, "Alice")).await?;
//! if content.is_local_only() {
//!     println!("stored locally; not yet publicly verifiable");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod public;

pub use config::FolioConfig;
pub use error::{SdkError, SdkResult};
pub use public::{PublicData, PublishedProof};

// Re-export key types
pub use folio_registry::{LoadSource, RegistryStats, UpsertOutcome};
pub use folio_types::{
    Attachment, AttachmentKind, Attestation, ContentRef, FreelancerProfile, ProofId, ProofMetadata,
    ProofRecord, WalletAddress,
};
