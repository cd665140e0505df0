//! Wrapped Anatha Administration CLI
//!
//! Entry point for the anatha-cli binary. Parses command-line arguments and
//! delegates to the appropriate command handler. Ledger state lives in a
//! JSON state file bundling a snapshot with the role table administering it.

use clap::Parser;
use std::env;

mod commands;
mod error;
mod state;

use commands::{Cli, run_command};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    run_command(cli)?;
    Ok(())
}
