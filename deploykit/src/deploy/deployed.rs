//! Deployed-address manifests written by the deployment engine

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::account::{validate_address, Address};
use crate::error::{Error, Result};

/// File the deployment engine writes into each deployment directory
pub const MANIFEST_FILE: &str = "deployed_addresses.json";

/// Path of the manifest for `deployment_id` under `root`
pub fn deployment_manifest_path(root: impl AsRef<Path>, deployment_id: &str) -> Result<PathBuf> {
    let id = Path::new(deployment_id);
    let single_component = matches!(id.components().collect::<Vec<_>>().as_slice(), [Component::Normal(_)]);

    if !single_component {
        return Err(Error::Config(format!("Invalid deployment id: {:?}", deployment_id)));
    }

    Ok(root.as_ref().join(id).join(MANIFEST_FILE))
}

/// Parse a manifest of the form `{"Module#Contract": "0x..."}`
pub fn parse_deployed_addresses(content: &str) -> Result<BTreeMap<String, Address>> {
    let raw: BTreeMap<String, String> = serde_json::from_str(content)?;

    raw.into_iter()
        .map(|(future, value)| {
            let address = validate_address(&value).map_err(|reason| Error::invalid_address(&future, &value, reason))?;
            Ok((future, address))
        })
        .collect()
}

/// Read and validate a manifest from disk
pub fn read_deployed_addresses(path: impl AsRef<Path>) -> Result<BTreeMap<String, Address>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let addresses = parse_deployed_addresses(&content)?;

    debug!(path = %path.display(), contracts = addresses.len(), "read deployed addresses");
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AddressError;

    #[test]
    fn test_manifest_path() {
        let path = deployment_manifest_path("ignition/deployments", "dep1").unwrap();
        assert_eq!(path, Path::new("ignition/deployments/dep1/deployed_addresses.json"));
    }

    #[test]
    fn test_manifest_path_rejects_traversal() {
        for id in ["", "..", "../dep1", "dep1/nested", "/abs"] {
            assert!(deployment_manifest_path("ignition/deployments", id).is_err(), "{} should be rejected", id);
        }
    }

    #[test]
    fn test_parse_manifest() {
        let content = r#"{"LiquidityControllerModule#LiquidityController": "0x10a0ddb46361b3f1d6405efffc1db96771bab85f"}"#;
        let addresses = parse_deployed_addresses(content).unwrap();

        assert_eq!(
            addresses["LiquidityControllerModule#LiquidityController"].to_string(),
            "0x10A0DDB46361b3F1d6405eFffc1Db96771bAb85F"
        );
    }

    #[test]
    fn test_parse_manifest_rejects_zero() {
        let content = r#"{"M#C": "0x0000000000000000000000000000000000000000"}"#;

        assert!(matches!(
            parse_deployed_addresses(content),
            Err(Error::InvalidAddress { reason: AddressError::Placeholder, ref key, .. }) if key == "M#C"
        ));
    }

    #[test]
    fn test_parse_manifest_rejects_garbage() {
        assert!(matches!(parse_deployed_addresses("[1, 2]"), Err(Error::Serialization(_))));
    }
}
