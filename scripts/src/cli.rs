//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{
    commands::{check, deploy, list_networks},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_DEPLOY_CONFIRMATIONS,
        DEFAULT_NETWORKS_PATH, WHITELIST_CONTRACT_NAME,
    },
    errors::ScriptError,
};

/// Deploy the Whitelist contract in front of a 0x Exchange
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Arguments shared by all commands
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by all commands
#[derive(Args)]
pub struct GlobalArgs {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Network RPC URL, overrides the network's configured `rpc_url`
    #[arg(short, long, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Path to the file mapping network ids to exchange addresses
    #[arg(long, env = "NETWORKS_PATH", default_value = DEFAULT_NETWORKS_PATH)]
    pub networks: PathBuf,

    /// Path to the file in which deployed addresses are recorded
    #[arg(long, env = "DEPLOYMENTS_PATH", default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments: PathBuf,

    /// Directory containing compiled contract artifacts
    #[arg(long, env = "ARTIFACTS_DIR", default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,
}

/// The commands supported by the deploy scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the Whitelist contract to a network
    Deploy(DeployArgs),
    /// Validate the networks file and the contract artifact without touching the network
    Check(CheckArgs),
    /// List the configured networks and any recorded deployments
    Networks,
}

impl Command {
    /// Run the command
    pub async fn run(self, global: &GlobalArgs) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => deploy(args, global).await,
            Command::Check(args) => check(args, global),
            Command::Networks => list_networks(global),
        }
    }
}

/// Deploy the Whitelist contract.
///
/// The constructor takes the address of the 0x Exchange contract to which the
/// Whitelist forwards orders after verifying that both maker and taker are whitelisted.
#[derive(Args)]
pub struct DeployArgs {
    /// The id of the network to deploy to, as named in the networks file
    #[arg(short, long)]
    pub network: String,

    /// Exchange contract address in hex, overrides the network's configured address
    #[arg(short, long, env = "EXCHANGE_ADDRESS")]
    pub exchange: Option<String>,

    /// The name of the contract artifact to deploy
    #[arg(short, long, default_value = WHITELIST_CONTRACT_NAME)]
    pub contract: String,

    /// The number of confirmations to wait for the deployment transaction, at least one
    #[arg(
        long,
        default_value_t = DEFAULT_DEPLOY_CONFIRMATIONS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub confirmations: u64,

    /// Skip the deployment if one is already recorded for the network
    #[arg(long)]
    pub no_overwrite: bool,

    /// Resolve all inputs and the expected contract address without sending a transaction
    #[arg(long)]
    pub dry_run: bool,
}

/// Validate the deployment inputs
#[derive(Args)]
pub struct CheckArgs {
    /// The name of the contract artifact to check
    #[arg(short, long, default_value = WHITELIST_CONTRACT_NAME)]
    pub contract: String,
}
