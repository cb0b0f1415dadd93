use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of blob a local-only key was synthesized for.
///
/// Each kind has a distinct key prefix so that a local-only key is
/// recognisable as "not remotely resolvable" even when printed as a bare
/// string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalKind {
    Registry,
    Freelancer,
    Proof,
    Metadata,
    Blob,
}

impl LocalKind {
    pub const ALL: [LocalKind; 5] = [
        LocalKind::Registry,
        LocalKind::Freelancer,
        LocalKind::Proof,
        LocalKind::Metadata,
        LocalKind::Blob,
    ];

    /// Key prefix, without the trailing underscore.
    pub const fn prefix(&self) -> &'static str {
        match self {
            LocalKind::Registry => "registry",
            LocalKind::Freelancer => "freelancer",
            LocalKind::Proof => "proof",
            LocalKind::Metadata => "metadata",
            LocalKind::Blob => "fallback",
        }
    }

    /// Recover the kind from a synthesized key, if the key carries a known prefix.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| {
            key.strip_prefix(kind.prefix())
                .is_some_and(|rest| rest.starts_with('_'))
        })
    }
}

/// Location of a stored blob.
///
/// A `Remote` ref was returned by a content-store provider and is assumed to
/// be globally resolvable. A `LocalOnly` ref was synthesized on this client
/// because no provider answered; it can only be resolved through the local
/// cache. The variant is fixed when the ref is created and travels with it
/// through the registry, so readers never inspect hash strings to decide
/// where to look.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "location", rename_all = "snake_case")]
pub enum ContentRef {
    Remote { hash: String },
    LocalOnly { key: String },
}

impl ContentRef {
    pub fn remote(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(TypeError::InvalidContentRef("empty remote hash".into()));
        }
        Ok(Self::Remote { hash })
    }

    pub fn local(key: impl Into<String>) -> Result<Self, TypeError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(TypeError::InvalidContentRef("empty local key".into()));
        }
        Ok(Self::LocalOnly { key })
    }

    /// Classify an untyped hash string received from outside the layer
    /// (configuration, legacy data) using the local-key prefix convention.
    pub fn classify(value: &str) -> Result<Self, TypeError> {
        match LocalKind::from_key(value) {
            Some(_) => Self::local(value),
            None => Self::remote(value),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub fn is_local_only(&self) -> bool {
        matches!(self, Self::LocalOnly { .. })
    }

    /// The bare hash or key.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Remote { hash } => hash,
            Self::LocalOnly { key } => key,
        }
    }

    /// The kind a local-only key was synthesized for.
    pub fn local_kind(&self) -> Option<LocalKind> {
        match self {
            Self::Remote { .. } => None,
            Self::LocalOnly { key } => LocalKind::from_key(key),
        }
    }
}

impl fmt::Debug for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { hash } => write!(f, "Remote({hash})"),
            Self::LocalOnly { key } => write!(f, "LocalOnly({key})"),
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
