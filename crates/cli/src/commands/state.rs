// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State store inspection commands

use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand};
use pit_core::column_family::ColumnFamily;
use pit_state::StateReader;
use std::path::PathBuf;

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    command: StateCommand,
}

#[derive(Subcommand)]
enum StateCommand {
    /// List decoded key/value pairs
    List(ListArgs),
    /// Point lookup of one value
    Get(GetArgs),
    /// Count keys per column family
    Statistics(StatisticsArgs),
}

#[derive(Args)]
struct ListArgs {
    /// State store directory
    #[arg(short = 'p', long)]
    path: PathBuf,
    /// Restrict to one column family (by name, case-insensitive)
    #[arg(long)]
    column_family: Option<ColumnFamily>,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Args)]
struct GetArgs {
    /// State store directory
    #[arg(short = 'p', long)]
    path: PathBuf,
    /// Column family to look in (by name, case-insensitive)
    #[arg(long)]
    column_family: ColumnFamily,
    /// Entity key
    #[arg(long)]
    key: i64,
}

#[derive(Args)]
struct StatisticsArgs {
    /// State store directory
    #[arg(short = 'p', long)]
    path: PathBuf,
}

pub fn handle(args: StateArgs) -> anyhow::Result<()> {
    match args.command {
        StateCommand::List(args) => list(args),
        StateCommand::Get(args) => get(args),
        StateCommand::Statistics(args) => statistics(args),
    }
}

fn list(args: ListArgs) -> anyhow::Result<()> {
    let reader = StateReader::open(&args.path)?;
    let entries = reader.list(args.column_family)?;
    tracing::debug!(entries = entries.len(), "listed state entries");
    output::print_list(&entries, args.format);
    Ok(())
}

fn get(args: GetArgs) -> anyhow::Result<()> {
    let reader = StateReader::open(&args.path)?;
    let value = reader.value_as_json(args.column_family, args.key)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn statistics(args: StatisticsArgs) -> anyhow::Result<()> {
    let reader = StateReader::open(&args.path)?;
    let counts = reader.statistics()?;
    println!("{}", serde_json::to_string_pretty(&counts)?);
    Ok(())
}
