use thiserror::Error;

/// Errors from encoding or decoding entity documents.
///
/// A `MissingField` on encode is the layer's encoding error: the input entity
/// is structurally invalid and the operation must not be retried.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{entity} is missing required field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("document schema mismatch: expected {expected}, found {found}")]
    SchemaMismatch { expected: &'static str, found: String },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

pub type CodecResult<T> = Result<T, CodecError>;
