//! Per-chain address registry
//!
//! A registry maps chain identifiers to the well-known contract addresses a
//! deployment depends on. Which keys are required is part of the registry's
//! [`RegistrySchema`]; every other key on a chain is an optional extension
//! field. Addresses are stored as written and validated on every read, so a
//! malformed entry can never leak into a resolved argument list.

mod builtin;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::account::{validate_address, Address};
use crate::error::{Error, Result};

pub use builtin::*;

/// EIP-155 chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Polygon PoS mainnet
    pub const POLYGON: ChainId = ChainId(137);

    /// The numeric identifier
    pub fn id(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for ChainId {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        value
            .trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::Config(format!("Invalid chain id: {}", value)))
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The set of keys every chain record must provide
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySchema {
    /// Required keys, in the order they are checked
    pub required: Vec<String>,
}

impl RegistrySchema {
    /// Create a schema from a list of required keys
    pub fn new<I, K>(required: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `key` is one of the required keys
    pub fn is_required(&self, key: &str) -> bool {
        self.required.iter().any(|k| k == key)
    }
}

/// The raw address entries of one chain, split into required and extension fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainAddresses {
    required: BTreeMap<String, String>,
    optional: BTreeMap<String, String>,
}

impl ChainAddresses {
    fn from_entries<I, K, V>(schema: &RegistrySchema, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut chain = Self::default();
        for (key, value) in entries {
            let key = key.into();
            if schema.is_required(&key) {
                chain.required.insert(key, value.into());
            } else {
                chain.optional.insert(key, value.into());
            }
        }
        chain
    }

    /// Raw value for `key`, required or optional
    pub fn get(&self, key: &str) -> Option<&str> {
        self.required
            .get(key)
            .or_else(|| self.optional.get(key))
            .map(String::as_str)
    }

    /// Entries for keys the schema requires
    pub fn required(&self) -> &BTreeMap<String, String> {
        &self.required
    }

    /// Extension entries
    pub fn optional(&self) -> &BTreeMap<String, String> {
        &self.optional
    }
}

/// Validated addresses for every required key of one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredAddresses(BTreeMap<String, Address>);

impl RequiredAddresses {
    /// Address for a required key
    pub fn get(&self, key: &str) -> Option<Address> {
        self.0.get(key).copied()
    }

    /// Iterate over `(key, address)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of required keys
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the schema requires nothing
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// On-disk registry format
#[derive(Debug, Deserialize)]
struct RegistryFile {
    required: Vec<String>,
    #[serde(default)]
    chains: BTreeMap<String, BTreeMap<String, String>>,
}

/// Read-only map from chain to contract addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressRegistry {
    schema: RegistrySchema,
    chains: BTreeMap<ChainId, ChainAddresses>,
}

impl AddressRegistry {
    /// Create an empty registry with the given schema
    pub fn new(schema: RegistrySchema) -> Self {
        Self {
            schema,
            chains: BTreeMap::new(),
        }
    }

    /// Add (or replace) the entries of one chain
    pub fn with_chain<I, K, V>(mut self, chain_id: ChainId, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let chain = ChainAddresses::from_entries(&self.schema, entries);
        self.chains.insert(chain_id, chain);
        self
    }

    /// The compiled-in registry
    pub fn builtin() -> Self {
        BUILTIN_CHAINS.iter().fold(
            Self::new(RegistrySchema::new(REQUIRED_KEYS)),
            |registry, (chain_id, entries)| registry.with_chain(*chain_id, entries.iter().copied()),
        )
    }

    /// Parse a TOML registry
    ///
    /// ```toml
    /// required = ["NonFungiblePositionManager", "SwapRouter"]
    ///
    /// [chains.137]
    /// NonFungiblePositionManager = "0xC36442b4a4522E871399CD717aBDD847Ab11FE88"
    /// SwapRouter = "0xE592427A0AEce92De3Edee1F18E0157C05861564"
    /// usdt = "0xc2132D05D31c914a87C6611C10748AEb04B58e8F"
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(content)?;
        if file.required.is_empty() {
            return Err(Error::Config("registry declares no required addresses".to_string()));
        }

        let mut registry = Self::new(RegistrySchema::new(file.required));
        for (chain_id, entries) in file.chains {
            registry = registry.with_chain(chain_id.parse::<ChainId>()?, entries);
        }
        Ok(registry)
    }

    /// Load a TOML registry from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), chains = registry.chains.len(), "loaded address registry");
        Ok(registry)
    }

    /// Chains with at least a record
    pub fn chains(&self) -> impl Iterator<Item = ChainId> + '_ {
        self.chains.keys().copied()
    }

    /// Raw record for a chain
    pub fn chain(&self, chain_id: ChainId) -> Option<&ChainAddresses> {
        self.chains.get(&chain_id)
    }

    /// Look up and validate `key` on `chain_id`.
    ///
    /// Absence is `Ok(None)`. A present value that is malformed or a
    /// placeholder is an error.
    pub fn lookup(&self, chain_id: ChainId, key: &str) -> Result<Option<Address>> {
        let Some(value) = self.chain(chain_id).and_then(|chain| chain.get(key)) else {
            debug!(chain_id = %chain_id, key, "address not configured");
            return Ok(None);
        };

        let address = validate_address(value).map_err(|reason| Error::invalid_address(key, value, reason))?;
        debug!(chain_id = %chain_id, key, address = %address, "resolved address");
        Ok(Some(address))
    }

    /// Look up `key` on `chain_id`, failing when it is absent
    pub fn require(&self, chain_id: ChainId, key: &str) -> Result<Address> {
        self.lookup(chain_id, key)?.ok_or_else(|| Error::MissingAddress {
            chain_id,
            key: key.to_string(),
        })
    }

    /// Validated addresses for every key the schema requires on `chain_id`
    pub fn required_addresses(&self, chain_id: ChainId) -> Result<RequiredAddresses> {
        self.schema
            .required
            .iter()
            .map(|key| -> Result<(String, Address)> { Ok((key.clone(), self.require(chain_id, key)?)) })
            .collect::<Result<BTreeMap<_, _>>>()
            .map(RequiredAddresses)
    }

    /// Validated extension addresses configured on `chain_id`
    pub fn optional_addresses(&self, chain_id: ChainId) -> Result<BTreeMap<String, Address>> {
        let Some(chain) = self.chain(chain_id) else {
            return Ok(BTreeMap::new());
        };

        chain
            .optional()
            .iter()
            .map(|(key, value)| {
                validate_address(value)
                    .map(|address| (key.clone(), address))
                    .map_err(|reason| Error::invalid_address(key, value, reason))
            })
            .collect()
    }
}
