use folio_types::LocalKind;

/// Domain-separated BLAKE3 hashing, one domain per kind of stored blob.
///
/// The domain tag is fed to the hasher ahead of the data, so a profile and a
/// proof with identical bytes never share a digest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    kind: LocalKind,
}

impl ContentHasher {
    pub const fn for_kind(kind: LocalKind) -> Self {
        Self { kind }
    }

    pub fn domain(&self) -> &'static str {
        match self.kind {
            LocalKind::Registry => "folio-registry-v1",
            LocalKind::Freelancer => "folio-profile-v1",
            LocalKind::Proof => "folio-proof-v1",
            LocalKind::Metadata => "folio-metadata-v1",
            LocalKind::Blob => "folio-blob-v1",
        }
    }

    pub fn hash(&self, data: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain().as_bytes());
        hasher.update(b":");
        hasher.update(data);
        *hasher.finalize().as_bytes()
    }

    pub fn hash_hex(&self, data: &[u8]) -> String {
        hex::encode(self.hash(data))
    }
}
