//! Wire documents stored in content blobs.
//!
//! Each document is a JSON object: the entity's own fields flattened at the
//! top level plus a `schema` tag. The full proof document additionally carries
//! the ref of its already-uploaded metadata document and the `isPublic`
//! marker. Both are written once at publish time.

use serde::{Deserialize, Serialize};

use folio_types::{ContentRef, FreelancerProfile, ProofMetadata, ProofRecord};

pub const PROFILE_SCHEMA: &str = "folio.profile/1";
pub const PROOF_SCHEMA: &str = "folio.proof/1";
pub const METADATA_SCHEMA: &str = "folio.proof-metadata/1";

/// A freelancer profile as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub schema: String,
    #[serde(flatten)]
    pub profile: FreelancerProfile,
}

/// A full proof record as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProofDocument {
    pub schema: String,
    #[serde(flatten)]
    pub proof: ProofRecord,
    /// Ref of the metadata document uploaded before this one.
    #[serde(rename = "publicMetadataHash")]
    pub public_metadata: ContentRef,
    #[serde(rename = "isPublic")]
    pub is_public: bool,
}

/// The public metadata view of a proof as stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataDocument {
    pub schema: String,
    #[serde(flatten)]
    pub metadata: ProofMetadata,
}
