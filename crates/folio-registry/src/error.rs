//! Error types for registry operations.

use thiserror::Error;

/// Errors that can occur during registry operations.
///
/// Provider and cache failures never appear here: the manager recovers from
/// them by falling back to the local cache.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry document could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A stored registry document could not be decoded.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}

/// Convenience type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
