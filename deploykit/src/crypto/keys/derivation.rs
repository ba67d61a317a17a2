//! Common key derivation types

use std::fmt;
use std::str::FromStr;

use secp256k1::PublicKey as Secp256k1PublicKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A parsed BIP-32 derivation path such as `m/44'/60'/0'/0/0`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<u32>);

impl DerivationPath {
    /// Child indices from the master key down, hardened ones offset by [`HARDENED_OFFSET`]
    pub fn components(&self) -> &[u32] {
        &self.0
    }

    /// Extend the path with one non-hardened child
    pub fn child(&self, index: u32) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(Error::KeyDerivation(format!(
                "Non-hardened child index out of range: {}",
                index
            )));
        }

        let mut components = self.0.clone();
        components.push(index);
        Ok(Self(components))
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let rest = match path.strip_prefix('m') {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => return Err(Error::KeyDerivation(format!("Invalid derivation path: {}", path))),
        };

        let mut result = Vec::new();

        for component in rest.split('/').skip(1) {
            let invalid = || Error::KeyDerivation(format!("Invalid derivation path component: {}", component));

            let (digits, hardened) = match component.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            let index = digits.parse::<u32>().map_err(|_| invalid())?;
            if index >= HARDENED_OFFSET {
                return Err(invalid());
            }

            result.push(if hardened { index + HARDENED_OFFSET } else { index });
        }

        Ok(Self(result))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m")?;
        for &index in &self.0 {
            if index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

/// A secp256k1 private key, wiped from memory on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: [u8; 32],
}

impl PrivateKey {
    /// Create a new private key from raw bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Get the raw private key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Hex encoding with `0x` prefix. Callers own the decision to display it.
    pub fn expose_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(**redacted**)")
    }
}

/// A secp256k1 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    inner: Secp256k1PublicKey,
}

impl PublicKey {
    pub(crate) fn new(inner: Secp256k1PublicKey) -> Self {
        Self { inner }
    }

    /// SEC1 compressed encoding (33 bytes)
    pub fn compressed(&self) -> [u8; 33] {
        self.inner.serialize()
    }

    /// SEC1 uncompressed encoding (65 bytes, leading 0x04)
    pub fn uncompressed(&self) -> [u8; 65] {
        self.inner.serialize_uncompressed()
    }

    /// Compressed encoding as `0x`-prefixed hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.compressed()))
    }
}

/// A derived key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    /// The private key
    private_key: PrivateKey,
    /// The public key
    public_key: PublicKey,
}

impl KeyPair {
    /// Create a new key pair
    pub fn new(private_key: PrivateKey, public_key: PublicKey) -> Self {
        Self { private_key, public_key }
    }

    /// Get the private key
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Get the public key
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_derivation_path() {
        let path: DerivationPath = "m/44'/60'/0'/0/7".parse().unwrap();

        assert_eq!(
            path.components(),
            &[44 + HARDENED_OFFSET, 60 + HARDENED_OFFSET, HARDENED_OFFSET, 0, 7]
        );
        assert_eq!(path.to_string(), "m/44'/60'/0'/0/7");
    }

    #[test]
    fn test_parse_master_path() {
        let path: DerivationPath = "m".parse().unwrap();
        assert!(path.components().is_empty());
        assert_eq!(path.to_string(), "m");
    }

    #[test]
    fn test_parse_invalid_paths() {
        for path in ["", "44'/60'", "m/", "m/x", "m/44''", "m//0", "m/2147483648", "n/0"] {
            assert!(path.parse::<DerivationPath>().is_err(), "{} should be rejected", path);
        }
    }

    #[test]
    fn test_child_rejects_hardened_range() {
        let path: DerivationPath = "m/44'/60'/0'/0".parse().unwrap();

        assert_eq!(path.child(2).unwrap().to_string(), "m/44'/60'/0'/0/2");
        assert!(path.child(HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_private_key_debug_is_redacted() {
        let key = PrivateKey::new([0x11; 32]);
        let printed = format!("{:?}", key);

        assert!(!printed.contains("11111111"));
        assert_eq!(key.expose_hex(), format!("0x{}", "11".repeat(32)));
    }
}
