//! Registry management for Folio.
//!
//! The registry is the single index of everything published: it maps each
//! wallet address to the ref of its current profile document and each proof
//! id to the refs of its proof and metadata documents. It is itself stored
//! as a content blob, re-uploaded in full after every change.
//!
//! # Architecture
//!
//! - **Entries** are upserted by key. A wallet or proof id appears at most
//!   once, and the derived totals always equal the list lengths.
//! - **The pointer** is the ref the registry was last persisted under. It is
//!   cached locally together with a full copy of the registry document.
//! - **Loading** happens lazily on first use: the cached pointer (or a
//!   configured bootstrap pointer) is resolved through the content store,
//!   then the local copy is tried, then an empty registry is created.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry operations
//! - [`types`] -- [`Registry`], its entries, and [`RegistryStats`]
//! - [`manager`] -- [`RegistryManager`], which loads, mutates, and persists

pub mod error;
pub mod manager;
pub mod types;

pub use error::{RegistryError, Result};
pub use manager::{LoadSource, RegistryManager, UpsertOutcome};
pub use types::{FreelancerEntry, ProofEntry, Registry, RegistryStats, REGISTRY_VERSION};
