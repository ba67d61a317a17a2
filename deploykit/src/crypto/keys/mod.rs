//! Key derivation and management
//!
//! This module provides BIP-32 derivation of secp256k1 keys and their
//! encoding as Ethereum accounts.

pub mod ethereum;
mod derivation;

pub use derivation::*;
pub use ethereum::{derive_key_pair, public_key_to_address};
