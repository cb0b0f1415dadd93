//! Entity codec for Folio.
//!
//! Maps profiles, proofs, and proof metadata to the canonical JSON documents
//! stored as content blobs, and back. Every document carries a `schema` tag so
//! a blob decoded as the wrong entity kind is rejected instead of silently
//! misread.
//!
//! The codec is pure and stateless: `decode(encode(x)) == x` for every entity
//! that passes validation.

pub mod codec;
pub mod document;
pub mod error;
pub mod validate;

pub use codec::EntityCodec;
pub use document::{
    MetadataDocument, ProfileDocument, ProofDocument, METADATA_SCHEMA, PROFILE_SCHEMA,
    PROOF_SCHEMA,
};
pub use error::{CodecError, CodecResult};
