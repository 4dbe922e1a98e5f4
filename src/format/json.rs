//! JSON reader

use crate::error::{ConfigError, Result};
use crate::utils::read_config_text;
use serde_json::Value;
use std::path::Path;

pub fn read(path: &Path) -> Result<Value> {
    let content = read_config_text(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::malformed(path, "JSON", e))
}
