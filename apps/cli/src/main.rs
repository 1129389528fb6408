//! Message exchange command-line client.

mod cli;
mod commands;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = config::Config::load(cli.config.as_deref())?;
    let credentials = config.credentials()?;
    let client_config = config.client_config()?;
    tracing::debug!(
        url = %config.url,
        mailbox = %config.mailbox_id,
        sandbox = config.sandbox,
        "configuration loaded"
    );

    let client = mesh_client::Client::new(&client_config, credentials)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(commands::run(&client, cli.command, &config.workflow_id))
}
