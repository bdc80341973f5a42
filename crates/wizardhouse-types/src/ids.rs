//! Identifiers used throughout Wizardhouse.
//!
//! Item ids are handed out by the minting collaborator and are only known to
//! be unique and non-decreasing. Slot ids are 1-based positions inside a
//! batch and are reused from one batch to the next.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::AuctionError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account address (bidder, owner, creators, treasury).
///
/// Serialized as a `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Never a valid bidder.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// First four bytes, hex encoded. Handy for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse a `0x`-prefixed (or bare) 40-character hex string.
    ///
    /// # Errors
    /// Returns [`AuctionError::InvalidAddress`] if the string is not 20 bytes of hex.
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed).map_err(|e| AuctionError::InvalidAddress {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AuctionError::InvalidAddress {
                input: s.to_string(),
                reason: "expected 20 bytes".to_string(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_hex(&text).map_err(serde::de::Error::custom)
    }
}

impl FromStr for Address {
    type Err = AuctionError;

    fn from_str(s: &str) -> crate::Result<Self> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Identifier of a minted collectible. Zero-based, assigned by the minter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SlotId
// ---------------------------------------------------------------------------

/// 1-based position of an auction inside the current batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SlotId(pub u32);

impl SlotId {
    /// The first slot of every batch.
    pub const FIRST: Self = Self(1);
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// BatchId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for a batch of slots.
///
/// `BatchId(0)` means no batch has been created yet.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct BatchId(pub u64);

impl BatchId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_hex_roundtrip() {
        let addr = Address(rand::random::<[u8; 20]>());
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 42);
        assert_eq!(Address::from_hex(&text).unwrap(), addr);
        assert_eq!(text.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_without_prefix_parses() {
        let addr = Address::from_hex("0102030405060708090a0b0c0d0e0f1011121314").unwrap();
        assert_eq!(addr.0[0], 1);
        assert_eq!(addr.0[19], 0x14);
        assert_eq!(addr.short(), "01020304");
    }

    #[test]
    fn address_rejects_wrong_length() {
        let err = Address::from_hex("0xdeadbeef").unwrap_err();
        assert!(matches!(err, AuctionError::InvalidAddress { .. }));
        let err = Address::from_hex("0xzz").unwrap_err();
        assert!(matches!(err, AuctionError::InvalidAddress { .. }));
    }

    #[test]
    fn zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address([1u8; 20]).is_zero());
    }

    #[test]
    fn batch_id_next() {
        assert_eq!(BatchId::default(), BatchId(0));
        assert_eq!(BatchId(4).next(), BatchId(5));
    }

    #[test]
    fn display_forms() {
        assert_eq!(ItemId(7).to_string(), "item:7");
        assert_eq!(SlotId(2).to_string(), "slot:2");
        assert_eq!(BatchId(3).to_string(), "batch:3");
    }

    #[test]
    fn serde_roundtrips() {
        let id = ItemId(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);

        let addr = Address([9u8; 20]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{addr}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }
}
