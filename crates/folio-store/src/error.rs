/// Errors from content store and local cache operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A remote provider call failed (network, auth, quota, non-2xx, timeout).
    ///
    /// The client recovers from this by moving to the next provider and
    /// finally to a fallback key; it never reaches callers of `upload`.
    #[error("provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    /// Neither a provider nor the local cache could produce the content.
    #[error("content unavailable: {0}")]
    ContentUnavailable(String),

    /// The local cache rejected a read or write.
    #[error("cache error: {0}")]
    Cache(String),

    /// A provider could not be constructed from its configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// I/O error from a file-backed cache.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn provider(provider: &str, reason: impl std::fmt::Display) -> Self {
        Self::ProviderUnavailable {
            provider: provider.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
