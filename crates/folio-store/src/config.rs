use serde::{Deserialize, Serialize};

pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_PINATA_API_URL: &str = "https://api.pinata.cloud";
pub const DEFAULT_PINATA_GATEWAY_URL: &str = "https://gateway.pinata.cloud";
pub const DEFAULT_IPFS_API_ENDPOINT: &str = "https://ipfs.infura.io:5001";

/// Provider configuration for the content store client.
///
/// Providers are tried in a fixed order: Pinata first when a JWT is set,
/// then the IPFS HTTP API when project keys are set. With neither, the
/// client runs in local-only mode.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Upper bound on each single provider call.
    pub provider_timeout_ms: u64,
    pub pinata: Option<PinataConfig>,
    pub ipfs_api: Option<IpfsApiConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            pinata: None,
            ipfs_api: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PinataConfig {
    pub jwt: String,
    #[serde(default = "default_pinata_api_url")]
    pub api_url: String,
    #[serde(default = "default_pinata_gateway_url")]
    pub gateway_url: String,
}

impl PinataConfig {
    pub fn new(jwt: impl Into<String>) -> Self {
        Self {
            jwt: jwt.into(),
            api_url: default_pinata_api_url(),
            gateway_url: default_pinata_gateway_url(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt.trim().is_empty()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpfsApiConfig {
    #[serde(default = "default_ipfs_api_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_secret: Option<String>,
    /// Gateway used for reads; `/api/v0/cat` on the endpoint otherwise.
    #[serde(default)]
    pub gateway_url: Option<String>,
}

impl IpfsApiConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            project_id: None,
            project_secret: None,
            gateway_url: None,
        }
    }

    pub fn with_credentials(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self.project_secret = Some(secret.into());
        self
    }

    /// Both project keys are present and non-empty.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.project_id) && present(&self.project_secret)
    }
}

fn default_pinata_api_url() -> String {
    DEFAULT_PINATA_API_URL.to_string()
}

fn default_pinata_gateway_url() -> String {
    DEFAULT_PINATA_GATEWAY_URL.to_string()
}

fn default_ipfs_api_endpoint() -> String {
    DEFAULT_IPFS_API_ENDPOINT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.provider_timeout_ms, 5_000);
        assert!(c.pinata.is_none());
        assert!(c.ipfs_api.is_none());
    }

    #[test]
    fn pinata_needs_jwt() {
        assert!(PinataConfig::new("eyJ.token").is_configured());
        assert!(!PinataConfig::new("  ").is_configured());
    }

    #[test]
    fn ipfs_needs_both_keys() {
        let base = IpfsApiConfig::new(DEFAULT_IPFS_API_ENDPOINT);
        assert!(!base.is_configured());
        let mut half = base.clone();
        half.project_id = Some("id".into());
        assert!(!half.is_configured());
        assert!(base.with_credentials("id", "secret").is_configured());
    }

    #[test]
    fn pinata_defaults_fill_in_from_json() {
        let c: PinataConfig = serde_json::from_str(r#"{"jwt":"abc"}"#).unwrap();
        assert_eq!(c.api_url, DEFAULT_PINATA_API_URL);
        assert_eq!(c.gateway_url, DEFAULT_PINATA_GATEWAY_URL);
    }
}
