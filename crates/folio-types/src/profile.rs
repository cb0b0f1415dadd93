use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentRef;
use crate::identity::WalletAddress;

/// A wallet or chain record attached to an entity.
///
/// Folio stores attestations verbatim. Nothing here verifies signatures or
/// looks transactions up on chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attestation {
    /// Network or signing scheme the record belongs to (e.g. "ethereum:sepolia").
    pub network: String,
    /// The record itself, as supplied by the wallet layer.
    pub record: serde_json::Value,
}

/// Public profile of a freelancer, keyed by wallet address.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerProfile {
    pub wallet_address: WalletAddress,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ContentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<Attestation>,
    /// Informational only; never used to resolve conflicts.
    pub last_updated: DateTime<Utc>,
}

impl FreelancerProfile {
    /// A minimal profile stamped with the current time.
    pub fn new(wallet_address: WalletAddress, name: impl Into<String>) -> Self {
        Self {
            wallet_address,
            name: name.into(),
            title: String::new(),
            bio: String::new(),
            skills: Vec::new(),
            hourly_rate: None,
            location: None,
            links: Vec::new(),
            avatar: None,
            attestation: None,
            last_updated: Utc::now(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attestation(mut self, attestation: Attestation) -> Self {
        self.attestation = Some(attestation);
        self
    }

    /// Stamp the profile with the current time.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
