//! deploykit - Deterministic deployment identities and constructor arguments
//!
//! This library derives the role wallets (deployer, admin, executor) used to
//! deploy and operate a set of contracts from a single secret seed, and resolves
//! the per-chain contract addresses and constructor arguments handed to an
//! external deployment engine.

pub mod error;
pub mod config;
pub mod crypto;
pub mod account;
pub mod registry;
pub mod deploy;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use crypto::Seed;
pub use account::{Address, DerivedWallet, Role, derive_wallet, derive_wallets};
pub use registry::{AddressRegistry, ChainId};
pub use deploy::{DeploymentArguments, DeploymentPlan, DeploymentTarget, Resolver};
pub use config::{ChainConfig, DeployConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
