//! Cryptographic primitives and operations
//!
//! This module provides seed handling and the key derivation required to turn
//! a single secret seed into role-bound Ethereum key pairs.

pub mod seed;
pub mod keys;

pub use seed::*;
pub use keys::*;
