//! Pinata managed-pinning provider.
//!
//! Uploads go to `pinFileToIPFS` as a multipart form authenticated with a JWT
//! bearer token; reads go through the configured HTTP gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::config::PinataConfig;
use crate::error::{StoreError, StoreResult};
use crate::links;
use crate::traits::{ContentProvider, ProviderReceipt};

const NAME: &str = "pinata";

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pin_size: u64,
}

/// Pinata pinning service client.
pub struct PinataProvider {
    client: reqwest::Client,
    jwt: String,
    api_url: Url,
    gateway_url: Url,
}

impl PinataProvider {
    pub fn new(config: &PinataConfig, timeout: Duration) -> StoreResult<Self> {
        if !config.is_configured() {
            return Err(StoreError::Configuration("pinata JWT is empty".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Configuration(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            jwt: config.jwt.clone(),
            api_url: links::parse_base("pinata API URL", &config.api_url)?,
            gateway_url: links::parse_base("pinata gateway", &config.gateway_url)?,
        })
    }

    fn gateway_link(&self, hash: &str) -> Url {
        links::gateway(&self.gateway_url, hash)
    }
}

#[async_trait]
impl ContentProvider for PinataProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn upload(&self, data: &[u8], name: &str) -> StoreResult<ProviderReceipt> {
        let url = links::join(&self.api_url, &["pinning", "pinFileToIPFS"]);
        let metadata = serde_json::json!({ "name": name }).to_string();
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("pinataMetadata", metadata);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::provider(NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::provider(NAME, format!("pin failed: {status}")));
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| StoreError::provider(NAME, format!("bad pin response: {e}")))?;
        if pinned.ipfs_hash.is_empty() {
            return Err(StoreError::provider(NAME, "pin response has no hash"));
        }
        debug!(hash = %pinned.ipfs_hash, size = pinned.pin_size, "pinned to pinata");

        Ok(ProviderReceipt {
            url: self.gateway_link(&pinned.ipfs_hash).into(),
            size: if pinned.pin_size > 0 {
                pinned.pin_size
            } else {
                data.len() as u64
            },
            hash: pinned.ipfs_hash,
        })
    }

    async fn resolve(&self, hash: &str) -> StoreResult<Vec<u8>> {
        let response = self
            .client
            .get(self.gateway_link(hash))
            .send()
            .await
            .map_err(|e| StoreError::provider(NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::provider(NAME, format!("gateway returned {status}")));
        }
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| StoreError::provider(NAME, e))
    }
}
