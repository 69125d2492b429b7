use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use whitelist_scripts::{
    cli::{Cli, Command, GlobalArgs},
    constants::DEFAULT_LOG_FILTER,
    errors::ScriptError,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Pick up `PKEY`, `RPC_URL`, `EXCHANGE_ADDRESS`, etc. from a local `.env`
    dotenv::dotenv().ok();
    let Cli { global, command } = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(command, &global).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Run the requested command
async fn run(command: Command, global: &GlobalArgs) -> Result<(), ScriptError> {
    command.run(global).await
}
