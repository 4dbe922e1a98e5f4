//! `get` command: print one value from the merged config.

use anyhow::Result;
use clap::Args;
use serde_json::Value;

use super::utils::SourceArgs;

#[derive(Args)]
pub struct GetArgs {
    /// Dotted key, e.g. `database.host` (empty prints everything)
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Value printed when the key is missing (JSON, or a plain string)
    #[arg(long, value_name = "VALUE")]
    pub default: Option<String>,

    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run(args: GetArgs) -> Result<()> {
    let default = args.default.as_deref().map(parse_default).unwrap_or(Value::Null);
    let mut repo = args.source.open_repository()?;
    let value = repo.get(&args.key, default)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn parse_default(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::parse_default;
    use serde_json::json;

    #[test]
    fn default_accepts_json_or_plain_text() {
        assert_eq!(parse_default("42"), json!(42));
        assert_eq!(parse_default("{\"a\":1}"), json!({"a": 1}));
        assert_eq!(parse_default("localhost"), json!("localhost"));
    }
}
