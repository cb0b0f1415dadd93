//! IPFS HTTP API provider.
//!
//! Talks to a hosted IPFS API (`/api/v0/add`, `/api/v0/cat`) such as a
//! managed node authenticated with project id/secret basic auth. Reads use
//! the gateway when one is configured and fall back to `cat` otherwise.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use tracing::debug;

use crate::config::IpfsApiConfig;
use crate::error::{StoreError, StoreResult};
use crate::links;
use crate::traits::{ContentProvider, ProviderReceipt};

const NAME: &str = "ipfs-api";

/// IPFS add response (sizes are reported as strings).
#[derive(Debug, Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
    #[serde(rename = "Size", default)]
    size: String,
}

/// IPFS HTTP API client.
pub struct IpfsApiProvider {
    client: reqwest::Client,
    endpoint: Url,
    credentials: Option<(String, String)>,
    gateway_url: Option<Url>,
}

impl IpfsApiProvider {
    pub fn new(config: &IpfsApiConfig, timeout: Duration) -> StoreResult<Self> {
        let endpoint = links::parse_base("IPFS API endpoint", &config.endpoint)?;
        let gateway_url = config
            .gateway_url
            .as_deref()
            .filter(|g| !g.trim().is_empty())
            .map(|g| links::parse_base("IPFS gateway", g))
            .transpose()?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Configuration(format!("HTTP client error: {e}")))?;
        let credentials = match (&config.project_id, &config.project_secret) {
            (Some(id), Some(secret)) => Some((id.clone(), secret.clone())),
            _ => None,
        };
        Ok(Self {
            client,
            endpoint,
            credentials,
            gateway_url,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some((id, secret)) => request.basic_auth(id, Some(secret)),
            None => request,
        }
    }

    fn api(&self, command: &str, query: &[(&str, &str)]) -> Url {
        let mut url = links::join(&self.endpoint, &["api", "v0", command]);
        url.query_pairs_mut().extend_pairs(query);
        url
    }

    fn link(&self, hash: &str) -> Url {
        match &self.gateway_url {
            Some(gateway) => links::gateway(gateway, hash),
            None => self.api("cat", &[("arg", hash)]),
        }
    }
}

#[async_trait]
impl ContentProvider for IpfsApiProvider {
    fn name(&self) -> &str {
        NAME
    }

    async fn upload(&self, data: &[u8], name: &str) -> StoreResult<ProviderReceipt> {
        let url = self.api("add", &[("pin", "true"), ("cid-version", "1")]);
        let part = reqwest::multipart::Part::bytes(data.to_vec()).file_name(name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .authorized(self.client.post(url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::provider(NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::provider(NAME, format!("add failed: {status}")));
        }

        let added: AddResponse = response
            .json()
            .await
            .map_err(|e| StoreError::provider(NAME, format!("bad add response: {e}")))?;
        if added.hash.is_empty() {
            return Err(StoreError::provider(NAME, "add response has no hash"));
        }
        debug!(hash = %added.hash, "added to IPFS");

        Ok(ProviderReceipt {
            url: self.link(&added.hash).into(),
            size: added.size.parse().unwrap_or(data.len() as u64),
            hash: added.hash,
        })
    }

    async fn resolve(&self, hash: &str) -> StoreResult<Vec<u8>> {
        let request = match &self.gateway_url {
            Some(_) => self.client.get(self.link(hash)),
            None => self.authorized(self.client.post(self.link(hash))),
        };
        let response = request.send().await.map_err(|e| StoreError::provider(NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::provider(NAME, format!("read failed: {status}")));
        }
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| StoreError::provider(NAME, e))
    }
}
