use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod decode;
pub mod emit;
pub mod version;
pub mod watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Listen on the snapshot channel and print decoded snapshots.
    Watch(WatchArgs),
    /// Decode a snapshot payload from disk and print it.
    Decode(DecodeArgs),
    /// Serve a payload file as snapshot frames (test producer).
    Emit(EmitArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Watch(args) => watch::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Emit(args) => emit::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Channel path to connect to. Default: the well-known rendezvous.
    pub path: Option<PathBuf>,
    /// Exit after receiving N snapshots.
    #[arg(long)]
    pub count: Option<usize>,
    /// Also print cycle errors to stdout instead of logging them.
    #[arg(long)]
    pub print_errors: bool,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File containing the snapshot payload.
    pub file: PathBuf,
    /// Treat the file as a length-prefixed frame capture instead of bare
    /// payload text.
    #[arg(long)]
    pub framed: bool,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Channel path to bind.
    pub path: PathBuf,
    /// File containing the payload to serve.
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,
    /// Number of connections to serve before exiting.
    #[arg(long, default_value = "1")]
    pub count: usize,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
