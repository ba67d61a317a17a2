//! Error types for the deploykit library

use thiserror::Error;

use crate::account::AddressError;
use crate::registry::ChainId;

/// Custom error type for deploykit operations
///
/// Every variant is a configuration or integrity failure. None of them are
/// transient, so callers are expected to abort rather than retry.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid wallet index {index}: {reason}")]
    InvalidIndex { index: u32, reason: String },

    #[error("Missing address for `{key}` on chain {chain_id}")]
    MissingAddress { chain_id: ChainId, key: String },

    #[error("Invalid address for `{key}` ({value}): {reason}")]
    InvalidAddress {
        key: String,
        value: String,
        #[source]
        reason: AddressError,
    },

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Target `{target}` expects {expected} {category} argument(s), got {actual}")]
    ArityMismatch {
        target: String,
        category: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown deployment target: {0}")]
    UnknownTarget(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Build an [`Error::InvalidAddress`] for a named registry or manifest key
    pub(crate) fn invalid_address(key: impl Into<String>, value: impl Into<String>, reason: AddressError) -> Self {
        Self::InvalidAddress {
            key: key.into(),
            value: value.into(),
            reason,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Result type for deploykit operations
pub type Result<T> = std::result::Result<T, Error>;
