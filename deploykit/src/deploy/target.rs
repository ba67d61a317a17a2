//! Constructor schemas of deployment targets

use crate::account::Role;
use crate::error::{Error, Result};
use crate::registry::{POSITION_MANAGER, SWAP_ROUTER};
use super::types::ArgValue;

/// Where a constructor argument comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgSource {
    /// An address from the registry, by key
    Registry(String),
    /// The address of the wallet derived at this index
    Role(u32),
    /// A fixed value
    Literal(ArgValue),
}

/// One named constructor parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorParam {
    /// Parameter name as declared by the contract
    pub name: String,
    /// Value source
    pub source: ArgSource,
}

impl ConstructorParam {
    /// A parameter fed by a registry address
    pub fn registry(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ArgSource::Registry(key.into()),
        }
    }

    /// A parameter fed by a role wallet's address
    pub fn role(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            source: ArgSource::Role(role.index()),
        }
    }

    /// A parameter with a fixed value
    pub fn literal(name: impl Into<String>, value: ArgValue) -> Self {
        Self {
            name: name.into(),
            source: ArgSource::Literal(value),
        }
    }
}

/// A contract's deployment module and its constructor signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    /// Short name used on the command line
    pub name: String,
    /// Deployment module identifier
    pub module: String,
    /// Contract to instantiate
    pub contract: String,
    /// Constructor parameters in declaration order
    pub params: Vec<ConstructorParam>,
}

impl DeploymentTarget {
    /// Create a target with no constructor parameters
    pub fn new(name: impl Into<String>, module: impl Into<String>, contract: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            contract: contract.into(),
            params: Vec::new(),
        }
    }

    /// Append a constructor parameter
    pub fn param(mut self, param: ConstructorParam) -> Self {
        self.params.push(param);
        self
    }

    /// `LiquidityController(manager, router, admin, executor)`
    pub fn liquidity_controller() -> Self {
        Self::new("liquidity-controller", "LiquidityControllerModule", "LiquidityController")
            .param(ConstructorParam::registry("manager", POSITION_MANAGER))
            .param(ConstructorParam::registry("router", SWAP_ROUTER))
            .param(ConstructorParam::role("admin", Role::Admin))
            .param(ConstructorParam::role("executor", Role::Executor))
    }

    /// Find a built-in target by short name, module or contract name
    pub fn by_name(name: &str) -> Result<Self> {
        [Self::liquidity_controller()]
            .into_iter()
            .find(|target| target.name == name || target.module == name || target.contract == name)
            .ok_or_else(|| Error::UnknownTarget(name.to_string()))
    }

    /// Registry keys of the address parameters, in order
    pub fn address_keys(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter_map(|param| match &param.source {
                ArgSource::Registry(key) => Some(key.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Wallet indices of the role parameters, in order
    pub fn role_indices(&self) -> Vec<u32> {
        self.params
            .iter()
            .filter_map(|param| match param.source {
                ArgSource::Role(index) => Some(index),
                _ => None,
            })
            .collect()
    }
}
