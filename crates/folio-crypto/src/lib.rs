//! Hashing primitives for Folio.
//!
//! Provides domain-separated BLAKE3 hashing and the deterministic fallback
//! key generator used when no remote content store accepts an upload.
//!
//! All hashing wraps `blake3` -- no custom cryptography.

pub mod fallback;
pub mod hasher;

pub use fallback::FallbackKeys;
pub use hasher::ContentHasher;
