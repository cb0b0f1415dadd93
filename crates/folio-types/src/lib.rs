//! Foundation types for Folio.
//!
//! Folio publishes freelancer profiles and proof-of-work records to
//! content-addressed storage. This crate holds the data model shared by every
//! other Folio crate.
//!
//! # Key Types
//!
//! - [`WalletAddress`] -- Opaque wallet identifier that keys a freelancer profile
//! - [`ProofId`] -- Caller-generated identifier that keys a proof record
//! - [`ContentRef`] -- Where a blob lives: a remote content hash or a local-only key
//! - [`FreelancerProfile`] -- Public profile of a freelancer
//! - [`ProofRecord`] -- A proof-of-work record with its [`Attachment`]s
//! - [`ProofMetadata`] -- The public metadata view of a proof
//! - [`Attestation`] -- Opaque wallet/chain record stored verbatim

pub mod content;
pub mod error;
pub mod identity;
pub mod profile;
pub mod proof;

pub use content::{ContentRef, LocalKind};
pub use error::TypeError;
pub use identity::{ProofId, WalletAddress};
pub use profile::{Attestation, FreelancerProfile};
pub use proof::{Attachment, AttachmentKind, AttachmentSummary, ProofMetadata, ProofRecord};
