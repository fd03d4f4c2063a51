//! `ledgerctl`: operator CLI for Ledger-KV nodes.

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use ledger_node::commands::{execute, Cli};
use ledger_node::config::NodeConfig;
use ledger_node::telemetry::init_logging;

fn run() -> Result<u8> {
    let cli = Cli::parse();
    let config = cli.config(NodeConfig::from_env().context("invalid environment configuration")?);
    init_logging(&config)?;
    debug!(?config, "Loaded configuration");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &config, &mut out)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
