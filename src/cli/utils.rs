//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use confcache::config::{load_settings, merge_cli_with_settings, CliOverrides};
use confcache::ConfigRepository;
use std::path::PathBuf;

/// Flags selecting the config directory and cache, shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Settings file (confcache.toml or confcache.yaml)
    #[arg(short = 's', long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Config directory to load
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Cache file location
    #[arg(short = 'c', long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Cache TTL in seconds (0 never expires)
    #[arg(long, value_name = "SECS", allow_negative_numbers = true)]
    pub ttl: Option<i64>,

    /// File names never cached (comma-separated)
    #[arg(short = 'x', long, value_name = "NAMES")]
    pub exclude: Option<String>,

    /// Explicit static files instead of a directory scan (comma-separated)
    #[arg(short = 'f', long, value_name = "FILES")]
    pub files: Option<String>,
}

impl SourceArgs {
    pub fn open_repository(&self) -> Result<ConfigRepository> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        let settings = load_settings(&cwd, self.settings.as_deref())?;
        let overrides = CliOverrides {
            config_dir: self.dir.clone(),
            cache_file: self.cache.clone(),
            ttl_secs: self.ttl,
            excluded_files: parse_csv(&self.exclude),
            files: parse_csv(&self.files).map(|v| v.into_iter().map(PathBuf::from).collect()),
        };
        let settings = merge_cli_with_settings(settings, overrides);
        tracing::debug!("Effective settings: {:?}", settings);
        Ok(settings.open_repository(&cwd)?)
    }
}

/// Parse a comma-separated string into a `Vec<String>`, trimming whitespace and
/// discarding empty segments.  Returns `None` when `value` is `None`.
pub fn parse_csv(value: &Option<String>) -> Option<Vec<String>> {
    value.as_ref().map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
    })
}
