use serde::de::DeserializeOwned;
use serde::Serialize;

use folio_types::{ContentRef, FreelancerProfile, ProofMetadata, ProofRecord};

use crate::document::{
    MetadataDocument, ProfileDocument, ProofDocument, METADATA_SCHEMA, PROFILE_SCHEMA,
    PROOF_SCHEMA,
};
use crate::error::{CodecError, CodecResult};
use crate::validate::{validate_metadata, validate_profile, validate_proof};

/// Codec for Folio entity documents.
pub struct EntityCodec;

impl EntityCodec {
    /// Encode a profile as a `folio.profile/1` document.
    pub fn encode_profile(profile: &FreelancerProfile) -> CodecResult<Vec<u8>> {
        validate_profile(profile)?;
        to_bytes(&ProfileDocument {
            schema: PROFILE_SCHEMA.to_string(),
            profile: profile.clone(),
        })
    }

    pub fn decode_profile(data: &[u8]) -> CodecResult<FreelancerProfile> {
        let doc: ProfileDocument = from_bytes(data)?;
        check_schema(PROFILE_SCHEMA, &doc.schema)?;
        Ok(doc.profile)
    }

    /// Encode the public metadata view of a proof.
    pub fn encode_metadata(metadata: &ProofMetadata) -> CodecResult<Vec<u8>> {
        validate_metadata(metadata)?;
        to_bytes(&MetadataDocument {
            schema: METADATA_SCHEMA.to_string(),
            metadata: metadata.clone(),
        })
    }

    pub fn decode_metadata(data: &[u8]) -> CodecResult<ProofMetadata> {
        let doc: MetadataDocument = from_bytes(data)?;
        check_schema(METADATA_SCHEMA, &doc.schema)?;
        Ok(doc.metadata)
    }

    /// Encode the full proof view, referencing its uploaded metadata document.
    pub fn encode_proof(proof: &ProofRecord, metadata: &ContentRef) -> CodecResult<Vec<u8>> {
        validate_proof(proof)?;
        to_bytes(&ProofDocument {
            schema: PROOF_SCHEMA.to_string(),
            proof: proof.clone(),
            public_metadata: metadata.clone(),
            is_public: true,
        })
    }

    /// Decode a full proof document, including its publish-time fields.
    pub fn decode_proof(data: &[u8]) -> CodecResult<ProofDocument> {
        let doc: ProofDocument = from_bytes(data)?;
        check_schema(PROOF_SCHEMA, &doc.schema)?;
        Ok(doc)
    }
}

fn to_bytes<T: Serialize>(doc: &T) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(doc).map_err(|e| CodecError::Serialization(e.to_string()))
}

fn from_bytes<T: DeserializeOwned>(data: &[u8]) -> CodecResult<T> {
    serde_json::from_slice(data).map_err(|e| CodecError::Deserialization(e.to_string()))
}

fn check_schema(expected: &'static str, found: &str) -> CodecResult<()> {
    if found != expected {
        tracing::debug!(expected, found, "document schema mismatch");
        return Err(CodecError::SchemaMismatch {
            expected,
            found: found.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use folio_types::{Attachment, AttachmentKind, Attestation, ProofId, WalletAddress};
    use proptest::prelude::*;

    fn wallet(s: &str) -> WalletAddress {
        WalletAddress::new(s).unwrap()
    }

    fn full_profile() -> FreelancerProfile {
        let mut profile = FreelancerProfile::new(wallet("0xW1"), "Alice")
            .with_title("Rust engineer")
            .with_bio("bio A")
            .with_skills(["rust", "wasm"])
            .with_attestation(Attestation {
                network: "ethereum:sepolia".into(),
                record: serde_json::json!({"tx": "0x01", "signature": "0xsig"}),
            });
        profile.hourly_rate = Some("90 USD".into());
        profile.location = Some("Lisbon".into());
        profile.links = vec!["https://alice.dev".into()];
        profile.avatar = Some(ContentRef::remote("QmAvatar").unwrap());
        profile
    }

    fn full_proof() -> ProofRecord {
        let mut image = Attachment::new(AttachmentKind::Image, "shot.png");
        image.size = Some(4096);
        image.preview = Some("data:image/png;base64,AAAA".into());
        image.content = Some(ContentRef::local("fallback_00ff").unwrap());
        let mut proof = ProofRecord::new(ProofId::new("P1").unwrap(), wallet("0xW1"), "Storefront")
            .with_description("Shipped a storefront")
            .with_tags(["web"])
            .with_attachment(image)
            .with_attachment(Attachment::new(AttachmentKind::Link, "https://shop.example"));
        proof.client_name = Some("Acme".into());
        proof
    }

    #[test]
    fn profile_roundtrip() {
        let profile = full_profile();
        let bytes = EntityCodec::encode_profile(&profile).unwrap();
        assert_eq!(EntityCodec::decode_profile(&bytes).unwrap(), profile);
    }

    #[test]
    fn proof_roundtrip_keeps_publish_fields() {
        let proof = full_proof();
        let meta_ref = ContentRef::remote("QmMeta").unwrap();
        let bytes = EntityCodec::encode_proof(&proof, &meta_ref).unwrap();
        let doc = EntityCodec::decode_proof(&bytes).unwrap();
        assert_eq!(doc.proof, proof);
        assert_eq!(doc.public_metadata, meta_ref);
        assert!(doc.is_public);
    }

    #[test]
    fn metadata_roundtrip() {
        let meta = full_proof().metadata();
        let bytes = EntityCodec::encode_metadata(&meta).unwrap();
        assert_eq!(EntityCodec::decode_metadata(&bytes).unwrap(), meta);
    }

    #[test]
    fn proof_document_field_names() {
        let metadata = ContentRef::remote("QmMeta").unwrap();
        let bytes = EntityCodec::encode_proof(&full_proof(), &metadata).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["schema"], PROOF_SCHEMA);
        assert_eq!(json["id"], "P1");
        assert_eq!(json["walletAddress"], "0xW1");
        assert_eq!(json["isPublic"], true);
        assert_eq!(json["publicMetadataHash"]["hash"], "QmMeta");
    }

    #[test]
    fn decoding_wrong_kind_is_schema_mismatch() {
        let bytes = EntityCodec::encode_metadata(&full_proof().metadata()).unwrap();
        let err = EntityCodec::decode_profile(&bytes).unwrap_err();
        // Metadata lacks `name`, so this fails before the schema check.
        assert!(matches!(err, CodecError::Deserialization(_)));

        let profile_bytes = EntityCodec::encode_profile(&full_profile()).unwrap();
        let mut json: serde_json::Value = serde_json::from_slice(&profile_bytes).unwrap();
        json["schema"] = serde_json::Value::String(PROOF_SCHEMA.into());
        let relabelled = serde_json::to_vec(&json).unwrap();
        let err = EntityCodec::decode_profile(&relabelled).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
    }

    #[test]
    fn garbage_is_deserialization_error() {
        assert!(matches!(
            EntityCodec::decode_proof(b"not json"),
            Err(CodecError::Deserialization(_))
        ));
    }

    #[test]
    fn invalid_entities_are_not_encoded() {
        let profile = FreelancerProfile::new(wallet("W1"), "");
        assert!(matches!(
            EntityCodec::encode_profile(&profile),
            Err(CodecError::MissingField { .. })
        ));
        let proof = ProofRecord::new(ProofId::new("P1").unwrap(), wallet("W1"), " ");
        assert!(EntityCodec::encode_proof(&proof, &ContentRef::remote("Qm").unwrap()).is_err());
    }

    #[test]
    fn encoding_is_stable() {
        let profile = full_profile();
        assert_eq!(
            EntityCodec::encode_profile(&profile).unwrap(),
            EntityCodec::encode_profile(&profile).unwrap()
        );
    }

    fn timestamp() -> impl Strategy<Value = chrono::DateTime<Utc>> {
        (0i64..4_000_000_000, 0u32..1_000_000_000)
            .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
    }

    prop_compose! {
        fn arb_profile()(
            wallet in "0x[0-9a-f]{1,40}",
            name in "[A-Za-z][A-Za-z ]{0,20}",
            bio in ".{0,60}",
            skills in prop::collection::vec("[a-z]{1,10}", 0..5),
            rate in prop::option::of("[0-9]{1,3} USD"),
            updated in timestamp(),
        ) -> FreelancerProfile {
            let mut p = FreelancerProfile::new(WalletAddress::new(wallet).unwrap(), name)
                .with_bio(bio)
                .with_skills(skills);
            p.hourly_rate = rate;
            p.last_updated = updated;
            p
        }
    }

    prop_compose! {
        fn arb_proof()(
            id in "[A-Za-z0-9-]{1,24}",
            title in "[A-Za-z][A-Za-z0-9 ]{0,30}",
            tags in prop::collection::vec("[a-z]{1,8}", 0..4),
            sizes in prop::collection::vec(prop::option::of(0u64..10_000_000), 0..3),
            created in timestamp(),
        ) -> ProofRecord {
            let mut p = ProofRecord::new(
                ProofId::new(id).unwrap(),
                WalletAddress::new("W1").unwrap(),
                title,
            )
            .with_tags(tags);
            for (i, size) in sizes.into_iter().enumerate() {
                let mut att = Attachment::new(AttachmentKind::Document, format!("file-{i}.pdf"));
                att.size = size;
                p.attachments.push(att);
            }
            p.created_at = created;
            p.last_updated = created;
            p
        }
    }

    proptest! {
        #[test]
        fn any_valid_profile_roundtrips(profile in arb_profile()) {
            let bytes = EntityCodec::encode_profile(&profile).unwrap();
            prop_assert_eq!(EntityCodec::decode_profile(&bytes).unwrap(), profile);
        }

        #[test]
        fn any_valid_proof_roundtrips(proof in arb_proof()) {
            let meta = ContentRef::local("metadata_0a").unwrap();
            let bytes = EntityCodec::encode_proof(&proof, &meta).unwrap();
            prop_assert_eq!(EntityCodec::decode_proof(&bytes).unwrap().proof, proof);
        }
    }
}
