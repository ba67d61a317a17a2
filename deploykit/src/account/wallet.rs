//! Role wallet derivation

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::keys::{derive_key_pair, public_key_to_address, DerivationPath, PrivateKey, PublicKey, HARDENED_OFFSET};
use crate::crypto::Seed;
use crate::error::{Error, Result};
use super::address::Address;

/// Parent of every role wallet: the first standard Ethereum account, external chain
pub const BASE_PATH: &str = "m/44'/60'/0'/0";

/// Functional roles and the wallet index each one is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Signs and pays for deployments
    Deployer,
    /// Owns the deployed contracts
    Admin,
    /// Runs day-to-day operations against the deployed contracts
    Executor,
}

impl Role {
    /// Every role, in index order
    pub const ALL: [Role; 3] = [Role::Deployer, Role::Admin, Role::Executor];

    /// The wallet index this role is bound to
    pub fn index(&self) -> u32 {
        match self {
            Self::Deployer => 0,
            Self::Admin => 1,
            Self::Executor => 2,
        }
    }

    /// The role conventionally bound to a wallet index, if any
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.index() == index)
    }

    /// Lowercase role name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deployer => "deployer",
            Self::Admin => "admin",
            Self::Executor => "executor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Derivation path of the wallet at `index`
pub fn derivation_path(index: u32) -> Result<DerivationPath> {
    if index >= HARDENED_OFFSET {
        return Err(Error::InvalidIndex {
            index,
            reason: format!("wallet indices must be below {}", HARDENED_OFFSET),
        });
    }

    BASE_PATH.parse::<DerivationPath>()?.child(index)
}

/// One role-bound identity derived from a seed
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedWallet {
    /// Role slot the wallet was derived for
    pub index: u32,
    /// Full derivation path
    pub path: DerivationPath,
    /// Account address
    pub address: Address,
    /// Public key
    pub public_key: PublicKey,
    /// Private key, never printed by `Debug`
    pub private_key: PrivateKey,
}

impl DerivedWallet {
    /// The role conventionally bound to this wallet's index
    pub fn role(&self) -> Option<Role> {
        Role::from_index(self.index)
    }
}

impl fmt::Debug for DerivedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedWallet")
            .field("index", &self.index)
            .field("path", &self.path.to_string())
            .field("address", &self.address)
            .field("public_key", &self.public_key.to_hex())
            .field("private_key", &self.private_key)
            .finish()
    }
}

/// Derives role wallets from one seed.
///
/// Holds no state beyond the borrowed seed, so derivation stays a pure
/// function of `(seed, index)`.
#[derive(Debug, Clone, Copy)]
pub struct HdWallet<'a> {
    seed: &'a Seed,
}

impl<'a> HdWallet<'a> {
    /// Create a deriver over a seed
    pub fn from_seed(seed: &'a Seed) -> Self {
        Self { seed }
    }

    /// Derive the wallet at `index`
    pub fn derive(&self, index: u32) -> Result<DerivedWallet> {
        let path = derivation_path(index)?;
        let key_pair = derive_key_pair(self.seed.as_bytes(), &path)?;
        let address = public_key_to_address(key_pair.public_key());

        debug!(index, path = %path, address = %address, "derived wallet");

        Ok(DerivedWallet {
            index,
            path,
            address,
            public_key: *key_pair.public_key(),
            private_key: key_pair.private_key().clone(),
        })
    }

    /// Derive the wallet bound to `role`
    pub fn derive_role(&self, role: Role) -> Result<DerivedWallet> {
        self.derive(role.index())
    }

    /// Derive one wallet per index, preserving order
    pub fn derive_many(&self, indices: &[u32]) -> Result<Vec<DerivedWallet>> {
        indices.iter().map(|&index| self.derive(index)).collect()
    }
}

/// Derive the wallet at `index` from `seed`
pub fn derive_wallet(seed: &Seed, index: u32) -> Result<DerivedWallet> {
    HdWallet::from_seed(seed).derive(index)
}

/// Derive one wallet per index from `seed`, preserving order
pub fn derive_wallets(seed: &Seed, indices: &[u32]) -> Result<Vec<DerivedWallet>> {
    HdWallet::from_seed(seed).derive_many(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_role_indices() {
        assert_eq!(Role::Deployer.index(), 0);
        assert_eq!(Role::Admin.index(), 1);
        assert_eq!(Role::Executor.index(), 2);
        assert_eq!(Role::from_index(1), Some(Role::Admin));
        assert_eq!(Role::from_index(3), None);
    }

    #[test]
    fn test_derivation_path() {
        assert_eq!(derivation_path(0).unwrap().to_string(), "m/44'/60'/0'/0/0");
        assert_eq!(derivation_path(2).unwrap().to_string(), "m/44'/60'/0'/0/2");
    }

    #[test]
    fn test_index_out_of_range() {
        let seed = Seed::new(ABANDON).unwrap();

        assert!(matches!(
            derive_wallet(&seed, HARDENED_OFFSET),
            Err(Error::InvalidIndex { index, .. }) if index == HARDENED_OFFSET
        ));
        assert!(matches!(derive_wallet(&seed, u32::MAX), Err(Error::InvalidIndex { .. })));
        assert!(derive_wallet(&seed, HARDENED_OFFSET - 1).is_ok());
    }

    #[test]
    fn test_standard_mnemonic_accounts() {
        let seed = Seed::new(ABANDON).unwrap();
        let wallets = derive_wallets(&seed, &[0, 1]).unwrap();

        assert_eq!(wallets[0].address.to_string(), "0x9858EfFD232B4033E47d90003D41EC34EcaEda94");
        assert_eq!(wallets[1].address.to_string(), "0x6Fac4D18c912343BF86fa7049364Dd4E424Ab9C0");
        assert_eq!(wallets[0].role(), Some(Role::Deployer));
    }

    #[test]
    fn test_debug_hides_private_key() {
        let seed = Seed::new(ABANDON).unwrap();
        let wallet = derive_wallet(&seed, 0).unwrap();
        let printed = format!("{:?}", wallet);

        assert!(printed.contains("redacted"));
        assert!(!printed.contains(&hex::encode(wallet.private_key.as_bytes())));
    }
}
