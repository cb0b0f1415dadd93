//! Deterministic local keys for blobs no remote store accepted.
//!
//! A fallback key is `"{prefix}_{hex}"`: the [`LocalKind`] prefix followed by
//! the first 16 bytes of a domain-separated BLAKE3 digest of the blob. The
//! same bytes uploaded as the same kind always yield the same key, so
//! re-publishing unchanged content while offline is idempotent.

use folio_types::{ContentRef, LocalKind};

use crate::hasher::ContentHasher;

/// Digest bytes kept in a fallback key.
const KEY_DIGEST_LEN: usize = 16;

/// Fallback key generator.
pub struct FallbackKeys;

impl FallbackKeys {
    /// Synthesize the local key for `data` uploaded as `kind`.
    pub fn key(kind: LocalKind, data: &[u8]) -> String {
        let digest = ContentHasher::for_kind(kind).hash(data);
        format!("{}_{}", kind.prefix(), hex::encode(&digest[..KEY_DIGEST_LEN]))
    }

    /// Synthesize a [`ContentRef::LocalOnly`] for `data` uploaded as `kind`.
    pub fn content_ref(kind: LocalKind, data: &[u8]) -> ContentRef {
        ContentRef::LocalOnly {
            key: Self::key(kind, data),
        }
    }
}
