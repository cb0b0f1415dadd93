//! URL building for HTTP providers.
//!
//! Content hashes come back from remote services, so they are always added
//! as escaped path segments or query values, never spliced into a string.

use reqwest::Url;

use crate::error::{StoreError, StoreResult};

/// Parse a configured base URL. It must be absolute and able to take path
/// segments.
pub(crate) fn parse_base(what: &str, value: &str) -> StoreResult<Url> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Configuration(format!("{what} is empty")));
    }
    let url = Url::parse(value)
        .map_err(|e| StoreError::Configuration(format!("invalid {what} {value:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(StoreError::Configuration(format!("{what} {value:?} cannot be a base URL")));
    }
    Ok(url)
}

/// `base` with `segments` appended to its path, each one percent-escaped.
pub(crate) fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Gateway read link: `{gateway}/ipfs/{hash}`.
pub(crate) fn gateway(base: &Url, hash: &str) -> Url {
    join(base, &["ipfs", hash])
}
