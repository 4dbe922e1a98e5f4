//! `cache` command: inspect or clear the cache file.

use anyhow::Result;
use clap::{Args, Subcommand};
use confcache::CacheStatus;

use super::utils::SourceArgs;

#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// Report whether the cache is valid for the current files
    Status(SourceArgs),

    /// Delete the cache file
    Clear(SourceArgs),
}

pub fn run(args: CacheArgs) -> Result<()> {
    match args.command {
        CacheCommand::Status(source) => {
            let repo = source.open_repository()?;
            let path = repo.store().path().display().to_string();
            match repo.cache_status()? {
                CacheStatus::Absent => println!("Cache: absent ({})", path),
                CacheStatus::Valid { created_at, age_secs } => println!(
                    "Cache: valid ({}), written {} ({}s ago)",
                    path,
                    created_at.to_rfc3339(),
                    age_secs
                ),
                CacheStatus::Stale(reason) => println!("Cache: stale ({}): {}", path, reason),
            }
        }
        CacheCommand::Clear(source) => {
            let mut repo = source.open_repository()?;
            repo.clear_cache()?;
            println!("Cache cleared: {}", repo.store().path().display());
        }
    }
    Ok(())
}
