//! `dump` command

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use super::utils::SourceArgs;

#[derive(Args)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: DumpArgs) -> Result<()> {
    let mut repo = args.source.open_repository()?;
    let tree = repo.load()?.clone();
    println!("{}", serde_json::to_string_pretty(&Value::Object(tree))?);

    let stats = repo.stats();
    tracing::debug!(
        "cache hits: {}, misses: {}, static parses: {}, dynamic parses: {}",
        stats.cache_hits,
        stats.cache_misses,
        stats.static_parses,
        stats.dynamic_parses
    );
    Ok(())
}
