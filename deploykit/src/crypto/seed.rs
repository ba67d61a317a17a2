//! Seed parsing and stretching

use std::fmt;

use bip39::Mnemonic;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// BIP-39 PBKDF2 round count
const PBKDF2_ROUNDS: u32 = 2048;
/// BIP-39 salt prefix, used with an empty passphrase
const PBKDF2_SALT: &[u8] = b"mnemonic";
/// Accepted raw seed lengths in bytes (BIP-32: 128 to 512 bits)
const RAW_SEED_MIN: usize = 16;
const RAW_SEED_MAX: usize = 64;

/// How a seed string was interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    /// A checksummed BIP-39 English mnemonic
    Mnemonic,
    /// `0x`-prefixed raw seed bytes
    RawHex,
    /// A single opaque token stretched the same way BIP-39 stretches a phrase
    Passphrase,
}

/// The secret all role wallets are derived from.
///
/// Only the stretched seed bytes are kept, in memory that is wiped on drop.
/// The phrase itself is never stored and `Debug` never prints either.
#[derive(Clone)]
pub struct Seed {
    kind: SeedKind,
    bytes: Zeroizing<Vec<u8>>,
}

impl Seed {
    /// Parse and stretch a seed string.
    ///
    /// A phrase of several words must be a valid BIP-39 mnemonic. A single
    /// `0x` token is decoded as raw seed bytes. Any other single token is
    /// treated as opaque entropy.
    pub fn new(phrase: &str) -> Result<Self> {
        let words: Vec<&str> = phrase.split_whitespace().collect();

        match words.as_slice() {
            [] => Err(Error::InvalidSeed("seed is empty".to_string())),
            [token] if token.starts_with("0x") => Self::from_raw_hex(token),
            [token] => Ok(Self::from_passphrase(token)),
            _ => {
                let normalized = Zeroizing::new(words.join(" "));
                Self::from_mnemonic(&normalized)
            }
        }
    }

    fn from_mnemonic(phrase: &str) -> Result<Self> {
        let mnemonic = Mnemonic::parse_normalized(phrase)
            .map_err(|e| Error::InvalidSeed(format!("not a valid BIP-39 mnemonic: {}", e)))?;

        let bytes = Zeroizing::new(mnemonic.to_seed_normalized("").to_vec());
        Ok(Self { kind: SeedKind::Mnemonic, bytes })
    }

    fn from_raw_hex(token: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(&token[2..])
                .map_err(|_| Error::InvalidSeed("raw seed is not valid hex".to_string()))?,
        );

        if !(RAW_SEED_MIN..=RAW_SEED_MAX).contains(&bytes.len()) {
            return Err(Error::InvalidSeed(format!(
                "raw seed must be {} to {} bytes, got {}",
                RAW_SEED_MIN,
                RAW_SEED_MAX,
                bytes.len()
            )));
        }

        Ok(Self { kind: SeedKind::RawHex, bytes })
    }

    fn from_passphrase(token: &str) -> Self {
        let mut bytes = Zeroizing::new(vec![0u8; 64]);
        pbkdf2::pbkdf2_hmac::<Sha512>(token.as_bytes(), PBKDF2_SALT, PBKDF2_ROUNDS, bytes.as_mut_slice());
        Self { kind: SeedKind::Passphrase, bytes }
    }

    /// How the seed string was interpreted
    pub fn kind(&self) -> SeedKind {
        self.kind
    }

    /// The stretched seed bytes fed into BIP-32
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("kind", &self.kind)
            .field("bytes", &"**redacted**")
            .finish()
    }
}
