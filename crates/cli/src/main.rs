// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! pit - Partition Inspection Tool
//!
//! Read-only inspection of a replicated engine partition: its raft log
//! segments and its embedded state store.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{log, state};

#[derive(Parser)]
#[command(
    name = "pit",
    version,
    about = "Partition inspection - query engine logs and state read-only"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the partition's raft log
    Log(log::LogArgs),
    /// Inspect the partition's state store
    State(state::StateArgs),
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Log(args) => log::handle(args),
        Commands::State(args) => state::handle(args),
    }
}

/// Diagnostics go to stderr so piped output stays machine-readable.
fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
