use thiserror::Error;

/// Errors produced by type construction and validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("invalid content reference: {0}")]
    InvalidContentRef(String),
}
