//! Address management

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::crypto::keys::ethereum::keccak256;

/// Why a string is not an acceptable address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("missing 0x prefix")]
    MissingPrefix,

    #[error("expected 40 hex digits, got {0}")]
    Length(usize),

    #[error("not valid hex")]
    InvalidHex,

    #[error("mixed-case address fails the EIP-55 checksum")]
    Checksum,

    #[error("zero or placeholder address where a real address is required")]
    Placeholder,
}

/// A 20-byte EVM account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// The conventional burn address, often left behind as a placeholder
    pub const DEAD: Address = Address([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xde, 0xad,
    ]);

    /// Create an address from raw bytes
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw address bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether every byte is zero
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Whether this is a value that stands in for "not configured yet"
    pub fn is_placeholder(&self) -> bool {
        self.is_zero() || *self == Self::DEAD
    }

    /// EIP-55 mixed-case checksum encoding
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let nibble = if i % 2 == 0 { hash[i / 2] >> 4 } else { hash[i / 2] & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if digits.len() != 40 {
            return Err(AddressError::Length(digits.len()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::InvalidHex)?;
        let address = Self(bytes);

        // Single-case input carries no checksum
        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.to_checksum()[2..] != *digits {
            return Err(AddressError::Checksum);
        }

        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse an address that must point at something real.
///
/// On top of the well-formedness rules of [`Address::from_str`] this rejects
/// the zero address and the burn placeholder.
pub fn validate_address(value: &str) -> Result<Address, AddressError> {
    let address: Address = value.trim().parse()?;
    if address.is_placeholder() {
        return Err(AddressError::Placeholder);
    }
    Ok(address)
}
