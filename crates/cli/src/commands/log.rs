// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log inspection commands

use crate::output::{self, OutputFormat};
use clap::{Args, Subcommand, ValueEnum};
use pit_log::{JournalReader, LogContentReader, LogSearch, LogStatusDetails};
use std::path::PathBuf;

#[derive(Args)]
pub struct LogArgs {
    #[command(subcommand)]
    command: LogCommand,
}

#[derive(Subcommand)]
enum LogCommand {
    /// Summarize the log in one streaming pass
    Status(StatusArgs),
    /// Print decoded log content
    Print(PrintArgs),
    /// Look up a single record or entry
    Search(SearchArgs),
}

#[derive(Args)]
struct StatusArgs {
    /// Partition directory (its last path segment is the partition id)
    #[arg(short = 'p', long)]
    path: PathBuf,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    /// Pretty-printed JSON array
    #[default]
    Json,
    /// Space-separated table, one row per record
    Table,
    /// DOT digraph of the causal record chain
    Dot,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LogFormat::Json => "json",
            LogFormat::Table => "table",
            LogFormat::Dot => "dot",
        })
    }
}

#[derive(Args)]
struct PrintArgs {
    /// Partition directory (its last path segment is the partition id)
    #[arg(short = 'p', long)]
    path: PathBuf,
    #[arg(long, value_enum, default_value_t)]
    format: LogFormat,
    /// Start at the first entry with this index or higher
    #[arg(long, conflicts_with = "from_position")]
    from_index: Option<i64>,
    /// Start at the first batch that could contain this position
    #[arg(long)]
    from_position: Option<i64>,
    /// Stop before the first batch starting at or past this position
    #[arg(long)]
    to_position: Option<i64>,
    /// Only batches with a record related to this process instance
    #[arg(long, conflicts_with = "rejections_only")]
    instance_key: Option<i64>,
    /// Only batches containing a command rejection
    #[arg(long)]
    rejections_only: bool,
}

#[derive(Args)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["position", "index"])
))]
struct SearchArgs {
    /// Partition directory (its last path segment is the partition id)
    #[arg(short = 'p', long)]
    path: PathBuf,
    /// Sequence number of a single record
    #[arg(long)]
    position: Option<i64>,
    /// Raft index of a single entry
    #[arg(long)]
    index: Option<i64>,
}

pub fn handle(args: LogArgs) -> anyhow::Result<()> {
    match args.command {
        LogCommand::Status(args) => status(args),
        LogCommand::Print(args) => print(args),
        LogCommand::Search(args) => search(args),
    }
}

fn status(args: StatusArgs) -> anyhow::Result<()> {
    let mut journal = JournalReader::open(&args.path)?;
    let details = LogStatusDetails::scan(&mut journal)?;
    output::print(&details, args.format);
    Ok(())
}

fn print(args: PrintArgs) -> anyhow::Result<()> {
    let journal = JournalReader::open(&args.path)?;
    let mut reader = LogContentReader::new(journal);

    if let Some(index) = args.from_index {
        reader.seek_to_index(index)?;
    }
    if let Some(position) = args.from_position {
        reader.seek_to_position(position)?;
    }
    if let Some(position) = args.to_position {
        reader.limit_to_position(position);
    }
    if let Some(key) = args.instance_key {
        reader.filter_for_process_instance(key);
    }
    if args.rejections_only {
        reader.only_rejections();
    }

    let content = reader.read_all()?;
    tracing::debug!(entries = content.records.len(), "decoded log content");
    match args.format {
        LogFormat::Json => println!("{}", serde_json::to_string_pretty(&content)?),
        LogFormat::Table => print!("{}", content.as_table()),
        LogFormat::Dot => print!("{}", content.as_dot_file()),
    }
    Ok(())
}

fn search(args: SearchArgs) -> anyhow::Result<()> {
    let journal = JournalReader::open(&args.path)?;
    let mut search = LogSearch::new(journal);

    if let Some(position) = args.position {
        match search.search_position(position)? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("No record found at position {position}"),
        }
    } else if let Some(index) = args.index {
        match search.search_index(index)? {
            Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
            None => println!("No entry found at index {index}"),
        }
    }
    Ok(())
}
