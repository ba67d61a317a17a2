//! Process configuration
//!
//! Configuration is read once, at startup, and passed explicitly to the rest
//! of the library. Nothing below this module reads the environment.

use std::path::PathBuf;

use tracing::info;
use zeroize::Zeroizing;

use crate::crypto::Seed;
use crate::error::{Error, Result};
use crate::registry::{AddressRegistry, ChainId};

/// Secret seed all role wallets are derived from
pub const SEED_VAR: &str = "DEPLOYER_ACCOUNT_SEED";
/// Target chain
pub const CHAIN_ID_VAR: &str = "DEPLOY_CHAIN_ID";
/// Optional TOML registry replacing the built-in one
pub const REGISTRY_PATH_VAR: &str = "DEPLOY_REGISTRY_PATH";

/// Which chain to target and where its addresses come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Chain to resolve addresses for
    pub chain_id: ChainId,
    /// Registry file, if the built-in registry is not used
    pub registry_path: Option<PathBuf>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::POLYGON,
            registry_path: None,
        }
    }
}

impl ChainConfig {
    /// Read the chain settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the chain settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let chain_id = match lookup(CHAIN_ID_VAR) {
            Some(value) => value.parse()?,
            None => ChainId::POLYGON,
        };

        let registry_path = lookup(REGISTRY_PATH_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            chain_id,
            registry_path,
        })
    }

    /// The registry file if one is configured, otherwise the built-in registry
    pub fn registry(&self) -> Result<AddressRegistry> {
        match &self.registry_path {
            Some(path) => AddressRegistry::load(path),
            None => {
                info!("using built-in address registry");
                Ok(AddressRegistry::builtin())
            }
        }
    }
}

/// Everything needed to derive wallets and resolve a deployment
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// The deployment seed
    pub seed: Seed,
    /// Chain settings
    pub chain: ChainConfig,
}

impl DeployConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`.
    ///
    /// A missing or empty seed is an error; there is no fallback seed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let phrase = Zeroizing::new(
            lookup(SEED_VAR).ok_or_else(|| Error::InvalidSeed(format!("{} is not set", SEED_VAR)))?,
        );
        let seed = Seed::new(&phrase).map_err(|e| match e {
            Error::InvalidSeed(reason) => Error::InvalidSeed(format!("{}: {}", SEED_VAR, reason)),
            other => other,
        })?;

        Ok(Self {
            seed,
            chain: ChainConfig::from_lookup(lookup)?,
        })
    }

    /// See [`ChainConfig::registry`]
    pub fn registry(&self) -> Result<AddressRegistry> {
        self.chain.registry()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DeployConfig::from_lookup(lookup(&[(SEED_VAR, "test-seed-A")])).unwrap();

        assert_eq!(config.chain, ChainConfig::default());
        assert_eq!(config.registry().unwrap(), AddressRegistry::builtin());
    }

    #[test]
    fn test_missing_seed_is_fatal() {
        let err = DeployConfig::from_lookup(lookup(&[(CHAIN_ID_VAR, "137")])).unwrap_err();
        assert!(matches!(err, Error::InvalidSeed(ref msg) if msg.contains(SEED_VAR)));
    }

    #[test]
    fn test_empty_seed_is_fatal() {
        let err = DeployConfig::from_lookup(lookup(&[(SEED_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, Error::InvalidSeed(_)));
    }

    #[test]
    fn test_chain_settings_do_not_need_a_seed() {
        let chain = ChainConfig::from_lookup(lookup(&[
            (CHAIN_ID_VAR, "1"),
            (REGISTRY_PATH_VAR, "config/registry.toml"),
        ]))
        .unwrap();

        assert_eq!(chain.chain_id, ChainId(1));
        assert_eq!(chain.registry_path, Some(PathBuf::from("config/registry.toml")));
    }

    #[test]
    fn test_blank_registry_path_is_ignored() {
        let chain = ChainConfig::from_lookup(lookup(&[(REGISTRY_PATH_VAR, " ")])).unwrap();
        assert!(chain.registry_path.is_none());
    }

    #[test]
    fn test_invalid_chain_id() {
        let err = DeployConfig::from_lookup(lookup(&[(SEED_VAR, "test-seed-A"), (CHAIN_ID_VAR, "polygon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
