use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Wallet address of a freelancer.
///
/// The address is opaque to Folio: it is supplied by the wallet layer and is
/// never parsed or checksummed here. It only has to be non-empty, and
/// surrounding whitespace is dropped on construction.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn new(address: impl Into<String>) -> Result<Self, TypeError> {
        let address = address.into();
        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyField {
                field: "wallet address",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WalletAddress({})", self.0)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a proof-of-work record.
///
/// Proof ids are generated by the caller. [`ProofId::generate`] is provided
/// for callers that have no id scheme of their own.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProofId(String);

impl ProofId {
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyField { field: "proof id" });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh time-ordered id (UUID v7).
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProofId {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProofId> for String {
    fn from(id: ProofId) -> Self {
        id.0
    }
}

impl fmt::Debug for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofId({})", self.0)
    }
}

impl fmt::Display for ProofId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wallet_address_is_trimmed() {
        let addr = WalletAddress::new("  0xabc  ").unwrap();
        assert_eq!(addr.as_str(), "0xabc");
    }

    #[test]
    fn empty_wallet_address_is_rejected() {
        assert_eq!(
            WalletAddress::new("   "),
            Err(TypeError::EmptyField {
                field: "wallet address"
            })
        );
    }

    #[test]
    fn wallet_address_serializes_as_plain_string() {
        let addr = WalletAddress::new("W1").unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"W1\"");
        let parsed: WalletAddress = serde_json::from_str("\"W1\"").unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn empty_wallet_address_fails_to_deserialize() {
        assert!(serde_json::from_str::<WalletAddress>("\"\"").is_err());
    }

    #[test]
    fn empty_proof_id_is_rejected() {
        assert!(ProofId::new("").is_err());
    }

    #[test]
    fn generated_proof_ids_are_unique() {
        let a = ProofId::generate();
        let b = ProofId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn display_is_raw_value() {
        let id = ProofId::new("P1").unwrap();
        assert_eq!(format!("{id}"), "P1");
        assert_eq!(format!("{id:?}"), "ProofId(P1)");
    }
}
