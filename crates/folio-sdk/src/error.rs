use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    /// The input entity is structurally invalid. Not retried.
    #[error("encoding error: {0}")]
    Encoding(#[from] folio_codec::CodecError),

    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),

    #[error("registry error: {0}")]
    Registry(#[from] folio_registry::error::RegistryError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
