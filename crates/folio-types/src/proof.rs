use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentRef;
use crate::identity::{ProofId, WalletAddress};
use crate::profile::Attestation;

/// What an attachment holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Document,
    Link,
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Document => "document",
            AttachmentKind::Link => "link",
        };
        f.write_str(s)
    }
}

/// A file or link belonging to exactly one proof.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Local preview (data URL or thumbnail path); never uploaded on its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Set once the attachment content has been uploaded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentRef>,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            size: None,
            preview: None,
            content: None,
        }
    }

    pub fn summary(&self) -> AttachmentSummary {
        AttachmentSummary {
            kind: self.kind,
            name: self.name.clone(),
            size: self.size,
        }
    }
}

/// Attachment as it appears in the public metadata view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentSummary {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// A proof-of-work record, keyed by its caller-generated id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    pub id: ProofId,
    pub wallet_address: WalletAddress,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attestation: Option<Attestation>,
    pub created_at: DateTime<Utc>,
    /// Informational only; never used to resolve conflicts.
    pub last_updated: DateTime<Utc>,
}

impl ProofRecord {
    /// A minimal proof stamped with the current time.
    pub fn new(id: ProofId, wallet_address: WalletAddress, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            wallet_address,
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            links: Vec::new(),
            attachments: Vec::new(),
            client_name: None,
            attestation: None,
            created_at: now,
            last_updated: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The public metadata view of this proof.
    pub fn metadata(&self) -> ProofMetadata {
        ProofMetadata {
            id: self.id.clone(),
            wallet_address: self.wallet_address.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            tags: self.tags.clone(),
            timestamp: self.created_at,
            attachments: self.attachments.iter().map(Attachment::summary).collect(),
            links: self.links.clone(),
        }
    }

    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

/// Public metadata view of a proof: what a browser of proofs needs without
/// fetching attachment content or attestations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofMetadata {
    pub id: ProofId,
    pub wallet_address: WalletAddress,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub attachments: Vec<AttachmentSummary>,
    pub links: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof() -> ProofRecord {
        ProofRecord::new(
            ProofId::new("P1").unwrap(),
            WalletAddress::new("W1").unwrap(),
            "Landing page",
        )
    }

    #[test]
    fn attachment_kind_uses_type_field() {
        let mut att = Attachment::new(AttachmentKind::Image, "shot.png");
        att.size = Some(2048);
        let json = serde_json::to_value(&att).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["size"], 2048);
        assert!(json.get("content").is_none());
    }

    #[test]
    fn unknown_attachment_kind_is_rejected() {
        let json = r#"{"type":"video","name":"clip.mp4"}"#;
        assert!(serde_json::from_str::<Attachment>(json).is_err());
    }

    #[test]
    fn metadata_view_summarises_attachments() {
        let mut att = Attachment::new(AttachmentKind::Document, "brief.pdf");
        att.size = Some(10);
        att.preview = Some("data:application/pdf;base64,AAAA".into());
        att.content = Some(ContentRef::remote("QmDoc").unwrap());
        let proof = proof()
            .with_description("Built a site")
            .with_tags(["web", "design"])
            .with_attachment(att);

        let meta = proof.metadata();
        assert_eq!(meta.id, proof.id);
        assert_eq!(meta.timestamp, proof.created_at);
        assert_eq!(meta.tags, vec!["web".to_string(), "design".to_string()]);
        assert_eq!(
            meta.attachments,
            vec![AttachmentSummary {
                kind: AttachmentKind::Document,
                name: "brief.pdf".into(),
                size: Some(10),
            }]
        );
    }

    #[test]
    fn new_proof_has_matching_timestamps() {
        let p = proof();
        assert_eq!(p.created_at, p.last_updated);
    }

    #[test]
    fn kind_display() {
        assert_eq!(AttachmentKind::Link.to_string(), "link");
    }
}
