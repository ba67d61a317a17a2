//! Constructor argument resolution

use tracing::{debug, info};

use crate::account::{derive_wallet, derive_wallets, Role};
use crate::crypto::Seed;
use crate::error::{Error, Result};
use crate::registry::{AddressRegistry, ChainId};
use super::target::{ArgSource, DeploymentTarget};
use super::types::{ArgValue, DeploymentArguments, DeploymentPlan};

/// Resolves deployment arguments against one registry
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a AddressRegistry,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a registry
    pub fn new(registry: &'a AddressRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `target`'s constructor arguments from explicit inputs.
    ///
    /// The k-th registry parameter of the target takes the address of the
    /// k-th entry of `address_keys`, the k-th role parameter takes the
    /// wallet derived for the k-th entry of `role_indices`. Both lists must
    /// have exactly as many entries as the target has parameters of that
    /// kind. Nothing is returned unless every value resolves.
    pub fn resolve_arguments<S: AsRef<str>>(
        &self,
        target: &DeploymentTarget,
        chain_id: ChainId,
        seed: &Seed,
        role_indices: &[u32],
        address_keys: &[S],
    ) -> Result<DeploymentArguments> {
        check_arity(target, "role", target.role_indices().len(), role_indices.len())?;
        check_arity(target, "address", target.address_keys().len(), address_keys.len())?;

        let wallets = derive_wallets(seed, role_indices)?;

        let addresses = address_keys
            .iter()
            .map(|key| self.registry.require(chain_id, key.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut wallets = wallets.into_iter();
        let mut addresses = addresses.into_iter();
        let mut values = Vec::with_capacity(target.params.len());

        for param in &target.params {
            let value = match &param.source {
                ArgSource::Registry(_) => addresses.next().map(ArgValue::Address),
                ArgSource::Role(_) => wallets.next().map(|wallet| ArgValue::Address(wallet.address)),
                ArgSource::Literal(value) => Some(value.clone()),
            };
            // Arity was checked above, so every source has a value left
            let value = value.ok_or_else(|| Error::ArityMismatch {
                target: target.name.clone(),
                category: "constructor",
                expected: target.params.len(),
                actual: values.len(),
            })?;

            debug!(deployment = %target.name, param = %param.name, value = %value, "resolved constructor argument");
            values.push(value);
        }

        info!(
            deployment = %target.name,
            chain_id = %chain_id,
            arguments = values.len(),
            "resolved deployment arguments"
        );

        Ok(DeploymentArguments::new(values))
    }

    /// Resolve `target`'s constructor arguments from its own declared keys and roles
    pub fn resolve(&self, target: &DeploymentTarget, chain_id: ChainId, seed: &Seed) -> Result<DeploymentArguments> {
        self.resolve_arguments(target, chain_id, seed, &target.role_indices(), &target.address_keys())
    }

    /// Resolve everything the deployment engine needs for `target`
    pub fn plan(&self, target: &DeploymentTarget, chain_id: ChainId, seed: &Seed) -> Result<DeploymentPlan> {
        let arguments = self.resolve(target, chain_id, seed)?;
        let deployer = derive_wallet(seed, Role::Deployer.index())?.address;

        Ok(DeploymentPlan {
            module: target.module.clone(),
            contract: target.contract.clone(),
            chain_id,
            deployer,
            arguments,
        })
    }
}

fn check_arity(target: &DeploymentTarget, category: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::ArityMismatch {
            target: target.name.clone(),
            category,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::target::ConstructorParam;
    use crate::registry::RegistrySchema;

    const MANAGER: &str = "0xC36442b4a4522E871399CD717aBDD847Ab11FE88";
    const ROUTER: &str = "0xE592427A0AEce92De3Edee1F18E0157C05861564";

    fn registry() -> AddressRegistry {
        AddressRegistry::new(RegistrySchema::new(["manager", "router"]))
            .with_chain(ChainId::POLYGON, [("manager", MANAGER), ("router", ROUTER)])
    }

    fn target() -> DeploymentTarget {
        DeploymentTarget::new("pool", "PoolModule", "Pool")
            .param(ConstructorParam::role("admin", Role::Admin))
            .param(ConstructorParam::registry("manager", "manager"))
            .param(ConstructorParam::literal("fee", ArgValue::Uint(3000)))
            .param(ConstructorParam::registry("router", "router"))
    }

    #[test]
    fn test_values_follow_declared_order() {
        let registry = registry();
        let seed = Seed::new("test-seed-A").unwrap();
        let args = Resolver::new(&registry)
            .resolve(&target(), ChainId::POLYGON, &seed)
            .unwrap();

        let admin = derive_wallet(&seed, 1).unwrap().address;
        assert_eq!(
            args.as_slice(),
            &[
                ArgValue::Address(admin),
                ArgValue::Address(MANAGER.parse().unwrap()),
                ArgValue::Uint(3000),
                ArgValue::Address(ROUTER.parse().unwrap()),
            ]
        );
    }

    #[test]
    fn test_explicit_keys_override_target_keys() {
        let registry = registry();
        let seed = Seed::new("test-seed-A").unwrap();
        let args = Resolver::new(&registry)
            .resolve_arguments(&target(), ChainId::POLYGON, &seed, &[2], &["router", "manager"])
            .unwrap();

        assert_eq!(args.as_slice()[1], ArgValue::Address(ROUTER.parse().unwrap()));
        assert_eq!(args.as_slice()[3], ArgValue::Address(MANAGER.parse().unwrap()));
        assert_eq!(args.as_slice()[0], ArgValue::Address(derive_wallet(&seed, 2).unwrap().address));
    }

    #[test]
    fn test_arity_mismatch() {
        let registry = registry();
        let resolver = Resolver::new(&registry);
        let seed = Seed::new("test-seed-A").unwrap();
        let no_keys: [&str; 0] = [];

        assert!(matches!(
            resolver.resolve_arguments(&target(), ChainId::POLYGON, &seed, &[], &["manager", "router"]),
            Err(Error::ArityMismatch { category: "role", expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            resolver.resolve_arguments(&target(), ChainId::POLYGON, &seed, &[1], &no_keys),
            Err(Error::ArityMismatch { category: "address", expected: 2, actual: 0, .. })
        ));
        assert!(matches!(
            resolver.resolve_arguments(&target(), ChainId::POLYGON, &seed, &[1, 2], &["manager", "router"]),
            Err(Error::ArityMismatch { category: "role", expected: 1, actual: 2, .. })
        ));
    }

    #[test]
    fn test_empty_categories_allowed_when_expected() {
        let registry = registry();
        let seed = Seed::new("test-seed-A").unwrap();
        let no_keys: [&str; 0] = [];
        let target = DeploymentTarget::new("flag", "FlagModule", "Flag")
            .param(ConstructorParam::literal("enabled", ArgValue::Bool(true)));

        let args = Resolver::new(&registry)
            .resolve_arguments(&target, ChainId::POLYGON, &seed, &[], &no_keys)
            .unwrap();
        assert_eq!(args.as_slice(), &[ArgValue::Bool(true)]);
    }

    #[test]
    fn test_plan_uses_deployer_wallet() {
        let registry = registry();
        let seed = Seed::new("test-seed-A").unwrap();
        let plan = Resolver::new(&registry)
            .plan(&target(), ChainId::POLYGON, &seed)
            .unwrap();

        assert_eq!(plan.module, "PoolModule");
        assert_eq!(plan.contract, "Pool");
        assert_eq!(plan.chain_id, ChainId::POLYGON);
        assert_eq!(plan.deployer, derive_wallet(&seed, 0).unwrap().address);
        assert_eq!(plan.arguments.len(), 4);
    }
}
