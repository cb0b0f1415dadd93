//! Structural checks applied before an entity is encoded.
//!
//! Wallet addresses and proof ids are already non-empty by construction;
//! these checks cover the free-text fields a document cannot do without.

use folio_types::{FreelancerProfile, ProofMetadata, ProofRecord};

use crate::error::{CodecError, CodecResult};

fn require(entity: &'static str, field: &'static str, value: &str) -> CodecResult<()> {
    if value.trim().is_empty() {
        return Err(CodecError::MissingField { entity, field });
    }
    Ok(())
}

pub fn validate_profile(profile: &FreelancerProfile) -> CodecResult<()> {
    require("profile", "name", &profile.name)
}

pub fn validate_proof(proof: &ProofRecord) -> CodecResult<()> {
    require("proof", "title", &proof.title)?;
    for attachment in &proof.attachments {
        require("attachment", "name", &attachment.name)?;
    }
    Ok(())
}

pub fn validate_metadata(metadata: &ProofMetadata) -> CodecResult<()> {
    require("proof metadata", "title", &metadata.title)?;
    for attachment in &metadata.attachments {
        require("attachment", "name", &attachment.name)?;
    }
    Ok(())
}
