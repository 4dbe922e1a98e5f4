//! `files` command: show how each candidate file is treated.

use anyhow::Result;
use clap::Args;

use super::utils::SourceArgs;

#[derive(Args)]
pub struct FilesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: FilesArgs) -> Result<()> {
    let repo = args.source.open_repository()?;
    let classified = repo.classify()?;

    println!("Config directory: {}", repo.config_dir().display());
    if classified.is_empty() {
        println!("  (no files)");
    }
    for file in classified {
        let shown = file.path.strip_prefix(repo.config_dir()).unwrap_or(&file.path);
        println!("  {:<8} {}", file.class.to_string(), shown.display());
    }
    Ok(())
}
