//! Command-line interface for confcache
//!
//! Provides `get`, `dump`, `files` and `cache` subcommands over a config directory.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod dump;
mod files;
mod get;
mod utils;

/// Load a directory of config files into one merged tree, with a validated cache
#[derive(Parser)]
#[command(name = "confcache")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a dotted key
    Get(get::GetArgs),

    /// Print the whole merged config as JSON
    Dump(dump::DumpArgs),

    /// List candidate files as static, dynamic or ignored
    Files(files::FilesArgs),

    /// Inspect or clear the cache file
    Cache(cache::CacheArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Commands::Get(args) => get::run(args),
        Commands::Dump(args) => dump::run(args),
        Commands::Files(args) => files::run(args),
        Commands::Cache(args) => cache::run(args),
    }
}
