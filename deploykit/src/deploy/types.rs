//! Deployment argument types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::Address;
use crate::registry::ChainId;

/// A typed constructor argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ArgValue {
    Address(Address),
    Uint(u64),
    Bool(bool),
    String(String),
}

impl ArgValue {
    /// The address, if this is an address argument
    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(address) => Some(*address),
            _ => None,
        }
    }
}

impl From<Address> for ArgValue {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(address) => write!(f, "{}", address),
            Self::Uint(value) => write!(f, "{}", value),
            Self::Bool(value) => write!(f, "{}", value),
            Self::String(value) => write!(f, "{:?}", value),
        }
    }
}

/// Constructor arguments in declared order.
///
/// Only the resolver builds these, and only once every value has been
/// resolved and validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentArguments(Vec<ArgValue>);

impl DeploymentArguments {
    pub(crate) fn new(values: Vec<ArgValue>) -> Self {
        Self(values)
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the constructor takes no arguments
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The arguments as a slice
    pub fn as_slice(&self) -> &[ArgValue] {
        &self.0
    }

    /// Iterate over the arguments
    pub fn iter(&self) -> std::slice::Iter<'_, ArgValue> {
        self.0.iter()
    }

    /// The address-typed arguments, in order
    pub fn addresses(&self) -> Vec<Address> {
        self.0.iter().filter_map(ArgValue::as_address).collect()
    }

    /// Consume into the underlying values
    pub fn into_inner(self) -> Vec<ArgValue> {
        self.0
    }
}

impl<'a> IntoIterator for &'a DeploymentArguments {
    type Item = &'a ArgValue;
    type IntoIter = std::slice::Iter<'a, ArgValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Everything the deployment engine needs to build one module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentPlan {
    /// Deployment module identifier
    pub module: String,
    /// Contract to instantiate
    pub contract: String,
    /// Chain the arguments were resolved for
    pub chain_id: ChainId,
    /// Account that signs the deployment
    pub deployer: Address,
    /// Constructor arguments
    pub arguments: DeploymentArguments,
}
