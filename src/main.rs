//! confcache: merged, cached configuration from a directory of config files
//!
//! Reads JSON, TOML, YAML and INI files, merges them under their file names,
//! and caches the result until the underlying files change.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
