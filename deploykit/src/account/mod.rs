//! Account management functionality
//!
//! This module provides the address type used throughout the crate and the
//! derivation of role-bound wallets from a seed.

mod address;
mod wallet;

pub use address::*;
pub use wallet::*;
