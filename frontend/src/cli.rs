//! Command line interface of the `phosphor-cheat` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::memory_image::{MemoryImage, SearchStep, WatchSpec, parse_byte};

#[derive(Debug, Parser)]
#[command(name = "phosphor-cheat", version)]
/// Load arcade cheat databases, run cheats and search memory on headless boards.
pub struct Cli {
    /// Settings file. Defaults to `<config dir>/phosphor/cheat.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Extra directory searched for database files, ahead of the configured ones.
    #[arg(long = "db-dir", global = true)]
    pub db_dirs: Vec<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the machines cheats can be hosted on.
    Machines,
    /// Print every cheat the configured databases hold for a machine.
    List {
        machine: String,
    },
    /// Activate cheats and run them for a number of frames.
    Run {
        machine: String,
        /// Index of a cheat to turn on (repeatable).
        #[arg(long = "enable")]
        enable: Vec<usize>,
        #[arg(long, default_value_t = 60)]
        frames: u32,
        /// Seed memory from a file: `cpu:address:path` (repeatable).
        #[arg(long = "image")]
        images: Vec<MemoryImage>,
        /// Show bytes after the run: `cpu:address:length` (repeatable).
        #[arg(long = "watch")]
        watches: Vec<WatchSpec>,
    },
    /// Search a CPU's writable memory for a value, then narrow the candidates.
    Search {
        machine: String,
        #[arg(long, default_value_t = 0)]
        cpu: usize,
        /// Value to start from; bytes one below it are kept too.
        /// Without it every scanned byte starts as a candidate.
        #[arg(long, value_parser = parse_byte)]
        value: Option<u8>,
        /// Seed memory from a file before the search starts (repeatable).
        #[arg(long = "image")]
        images: Vec<MemoryImage>,
        /// Narrowing step: `<comparison>[@cpu:address:path]` (repeatable).
        #[arg(long = "then")]
        steps: Vec<SearchStep>,
        /// Undo the last narrowing step before printing.
        #[arg(long)]
        restore: bool,
    },
}
