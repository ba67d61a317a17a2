//! deploykit command-line interface
//!
//! Inspect the role wallets derived from the deployment seed, the address
//! registry and the deployment plan handed to the deployment engine.
//! Results go to stdout as JSON; logs go to stderr.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deploykit::deploy::{deployment_manifest_path, read_deployed_addresses};
use deploykit::registry::RequiredAddresses;
use deploykit::{
    derive_wallets, Address, ChainConfig, ChainId, DeployConfig, DeploymentTarget, Resolver, Role,
};

#[derive(Parser)]
#[command(name = "deploykit")]
#[command(about = "Deployment identities and constructor arguments")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Registry file overriding DEPLOY_REGISTRY_PATH
    #[arg(short, long, global = true)]
    registry: Option<PathBuf>,

    /// Chain id overriding DEPLOY_CHAIN_ID
    #[arg(short, long, global = true)]
    chain_id: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the role wallets from DEPLOYER_ACCOUNT_SEED
    Wallets {
        /// Derivation index, repeatable
        #[arg(short, long = "index", default_values_t = [0u32, 1, 2])]
        indices: Vec<u32>,

        /// Include private keys in the output
        #[arg(long)]
        reveal_keys: bool,
    },
    /// Show the validated registry entries for the chain
    Registry,
    /// Resolve a deployment target into a deployment plan
    Plan {
        /// Target name, module name or contract name
        #[arg(short, long, default_value = "liquidity-controller")]
        target: String,
    },
    /// Read the addresses recorded for a finished deployment
    Deployed {
        /// Deployment id
        #[arg(long)]
        id: String,

        /// Directory holding deployment results
        #[arg(long, default_value = "ignition/deployments")]
        root: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletReport {
    index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    path: String,
    address: Address,
    public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegistryReport {
    chain_id: ChainId,
    required: RequiredAddresses,
    optional: BTreeMap<String, Address>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Wallets { indices, reveal_keys } => handle_wallets(&cli, indices, *reveal_keys),
        Commands::Registry => handle_registry(&cli),
        Commands::Plan { target } => handle_plan(&cli, target),
        Commands::Deployed { id, root } => handle_deployed(root, id),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Apply the command-line overrides on top of the environment settings
fn apply_overrides(mut chain: ChainConfig, cli: &Cli) -> ChainConfig {
    if let Some(chain_id) = cli.chain_id {
        chain.chain_id = ChainId(chain_id);
    }
    if let Some(path) = &cli.registry {
        chain.registry_path = Some(path.clone());
    }
    chain
}

fn load_deploy_config(cli: &Cli) -> Result<DeployConfig> {
    let mut config = DeployConfig::from_env().context("Failed to load deployment configuration")?;
    config.chain = apply_overrides(config.chain, cli);
    Ok(config)
}

fn load_chain_config(cli: &Cli) -> Result<ChainConfig> {
    let chain = ChainConfig::from_env().context("Failed to load chain configuration")?;
    Ok(apply_overrides(chain, cli))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_wallets(cli: &Cli, indices: &[u32], reveal_keys: bool) -> Result<()> {
    let config = load_deploy_config(cli)?;
    if reveal_keys {
        warn!("private keys will be written to stdout");
    }

    let wallets = derive_wallets(&config.seed, indices).context("Failed to derive wallets")?;
    info!(count = wallets.len(), "derived wallets");

    let reports: Vec<WalletReport> = wallets
        .iter()
        .map(|wallet| WalletReport {
            index: wallet.index,
            role: wallet.role(),
            path: wallet.path.to_string(),
            address: wallet.address,
            public_key: wallet.public_key.to_hex(),
            private_key: reveal_keys.then(|| wallet.private_key.expose_hex()),
        })
        .collect();

    print_json(&reports)
}

fn handle_registry(cli: &Cli) -> Result<()> {
    let chain = load_chain_config(cli)?;
    let registry = chain.registry().context("Failed to load address registry")?;

    let report = RegistryReport {
        chain_id: chain.chain_id,
        required: registry.required_addresses(chain.chain_id)?,
        optional: registry.optional_addresses(chain.chain_id)?,
    };

    print_json(&report)
}

fn handle_plan(cli: &Cli, target: &str) -> Result<()> {
    let config = load_deploy_config(cli)?;
    let registry = config.registry().context("Failed to load address registry")?;
    let target = DeploymentTarget::by_name(target)?;

    let plan = Resolver::new(&registry)
        .plan(&target, config.chain.chain_id, &config.seed)
        .with_context(|| format!("Failed to resolve {} on chain {}", target.name, config.chain.chain_id))?;
    info!(module = %plan.module, chain_id = %plan.chain_id, "deployment plan ready");

    print_json(&plan)
}

fn handle_deployed(root: &Path, id: &str) -> Result<()> {
    let path = deployment_manifest_path(root, id)?;
    let addresses = read_deployed_addresses(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    print_json(&addresses)
}
