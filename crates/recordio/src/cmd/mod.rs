use clap::{Args, Subcommand};
use recordio_frame::FrameConfig;
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod append;
pub mod dump;
pub mod stat;
pub mod version;

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Context {
    pub format: OutputFormat,
    pub frame_config: FrameConfig,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append records to a file.
    Append(AppendArgs),
    /// Print every record in a file.
    Dump(DumpArgs),
    /// Count records and check the file reads to a clean end.
    Stat(StatArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, ctx: &Context) -> CliResult<i32> {
    match command {
        Command::Append(args) => append::run(args, ctx),
        Command::Dump(args) => dump::run(args, ctx),
        Command::Stat(args) => stat::run(args, ctx),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct AppendArgs {
    /// Record file to append to (created if missing).
    pub path: PathBuf,
    /// Raw string record. Repeatable; written first, in order.
    #[arg(long)]
    pub data: Vec<String>,
    /// JSON record, validated and re-serialized compactly. Repeatable; written after --data.
    #[arg(long)]
    pub json: Vec<String>,
    /// Read one record from each file. Repeatable; written last.
    #[arg(long)]
    pub file: Vec<PathBuf>,
    /// Start a fresh file instead of appending.
    #[arg(long)]
    pub truncate: bool,
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Record file to read.
    pub path: PathBuf,
    /// Stop after N records.
    #[arg(long)]
    pub limit: Option<u64>,
}

#[derive(Args, Debug)]
pub struct StatArgs {
    /// Record file to read.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
