//! Content store client for Folio.
//!
//! Uploads named blobs to remote content-addressed providers and resolves
//! them back, degrading to a local cache when no provider answers. This is
//! the leaf of the publishing stack: it never interprets blob contents.
//!
//! # Providers
//!
//! All providers implement the [`ContentProvider`] trait and are tried in
//! the order they were registered, once each per operation:
//!
//! - [`PinataProvider`] -- managed pinning service with JWT auth
//! - [`IpfsApiProvider`] -- IPFS HTTP API with optional project-key auth
//! - [`MemoryProvider`] -- in-process store for tests and embedding
//!
//! # Local Cache
//!
//! All caches implement [`LocalCache`]:
//!
//! - [`MemoryCache`] -- `HashMap`-based, lost on drop
//! - [`FileCache`] -- one file per key under a directory
//!
//! # Design Rules
//!
//! 1. `upload` always returns a ref. With no provider answering, the ref is
//!    a deterministic [`ContentRef::LocalOnly`] key and the blob is cached
//!    under it.
//! 2. Every provider call is bounded by the client timeout.
//! 3. A failed provider is not retried within the same operation.
//! 4. `LocalOnly` refs are never sent to providers.
//!
//! [`ContentRef::LocalOnly`]: folio_types::ContentRef::LocalOnly

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod file_cache;
pub mod ipfs;
pub mod keys;
mod links;
pub mod memory;
pub mod pinata;
pub mod traits;

pub use cache::{LocalCache, MemoryCache};
pub use client::{ContentStoreClient, UploadResult};
pub use config::{IpfsApiConfig, PinataConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use file_cache::FileCache;
pub use ipfs::IpfsApiProvider;
pub use memory::MemoryProvider;
pub use pinata::PinataProvider;
pub use traits::{ContentProvider, ProviderReceipt};
