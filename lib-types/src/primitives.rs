//! Canonical Primitive Types for the Wrapped Anatha Ledger
//!
//! These types are the foundational building blocks for all ledger state.
//! They are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Token amounts in base units (supports up to ~340 undecillion units)
pub type Amount = u128;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte account address
///
/// The all-zero address is reserved: it is never a valid transfer recipient
/// or approval spender, and it stands in for "minted from" / "burned to" in
/// event notifications.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Error parsing an address from its hex form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressParseError {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("invalid address length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for Address {
    type Err = AddressParseError;

    /// Parse a 64-hex-digit address, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(raw).map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressParseError::InvalidLength(bytes.len()))?;
        Ok(Address(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::zero().is_zero());
        assert!(!Address::new([1u8; 32]).is_zero());
        assert_eq!(Address::default(), Address::zero());
    }

    #[test]
    fn address_display_round_trip() {
        let addr = Address::new([0xab; 32]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn address_parse_with_prefix() {
        let addr = Address::new([0x11; 32]);
        let prefixed = format!("0x{}", addr);
        assert_eq!(prefixed.parse::<Address>().unwrap(), addr);
    }

    #[test]
    fn address_parse_rejects_bad_input() {
        assert!(matches!(
            "zz".parse::<Address>(),
            Err(AddressParseError::InvalidHex(_))
        ));
        assert!(matches!(
            "abcd".parse::<Address>(),
            Err(AddressParseError::InvalidLength(2))
        ));
    }

    #[test]
    fn address_serialization_round_trip() {
        let addr = Address::new([7u8; 32]);
        let serialized = bincode::serialize(&addr).expect("serialize");
        let deserialized: Address = bincode::deserialize(&serialized).expect("deserialize");
        assert_eq!(addr, deserialized);
    }
}
