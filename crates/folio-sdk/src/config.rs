//! Facade configuration.
//!
//! Loaded from TOML, then optionally overridden from the environment so that
//! provider secrets never have to live in a config file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use folio_store::{IpfsApiConfig, PinataConfig, StoreConfig};

use crate::error::SdkResult;

pub const ENV_PINATA_JWT: &str = "FOLIO_PINATA_JWT";
pub const ENV_IPFS_PROJECT_ID: &str = "FOLIO_IPFS_PROJECT_ID";
pub const ENV_IPFS_PROJECT_SECRET: &str = "FOLIO_IPFS_PROJECT_SECRET";
pub const ENV_CACHE_DIR: &str = "FOLIO_CACHE_DIR";
pub const ENV_REGISTRY_POINTER: &str = "FOLIO_REGISTRY_POINTER";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub store: StoreConfig,
    /// Directory of the file-backed local cache. In-memory when absent.
    pub cache_dir: Option<PathBuf>,
    /// Registry pointer to start from when none is cached locally.
    pub registry_pointer: Option<String>,
}

impl FolioConfig {
    pub fn from_toml_str(content: &str) -> SdkResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply `FOLIO_*` environment variables over the loaded values.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());

        if let Some(jwt) = var(ENV_PINATA_JWT) {
            match self.store.pinata.as_mut() {
                Some(pinata) => pinata.jwt = jwt,
                None => self.store.pinata = Some(PinataConfig::new(jwt)),
            }
        }

        let id = var(ENV_IPFS_PROJECT_ID);
        let secret = var(ENV_IPFS_PROJECT_SECRET);
        if id.is_some() || secret.is_some() {
            let ipfs = self.store.ipfs_api.get_or_insert_with(|| {
                IpfsApiConfig::new(folio_store::config::DEFAULT_IPFS_API_ENDPOINT)
            });
            if id.is_some() {
                ipfs.project_id = id;
            }
            if secret.is_some() {
                ipfs.project_secret = secret;
            }
        }

        if let Some(dir) = var(ENV_CACHE_DIR) {
            self.cache_dir = Some(PathBuf::from(dir));
        }
        if let Some(pointer) = var(ENV_REGISTRY_POINTER) {
            self.registry_pointer = Some(pointer);
        }
        self
    }
}
