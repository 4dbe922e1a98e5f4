//! INI reader with typed value scanning.
//!
//! Sections become nested mappings. Unquoted values are coerced:
//! `true`/`on`/`yes` and `false`/`off`/`no`/`none` to booleans, `null` to
//! null, integer and decimal literals to numbers, anything else stays a
//! string. Quoted values are never coerced. `key[] = v` appends to a list and
//! `key[name] = v` sets a nested key.

use crate::error::{ConfigError, Result};
use crate::utils::read_config_text;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Number, Value};
use std::path::Path;

static SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\s*([^\]]+?)\s*\]$").unwrap());
static ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^=\[\]]+?)\s*(?:\[\s*([^\]]*?)\s*\])?\s*=\s*(.*)$").unwrap());
static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+$").unwrap());
static DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?(\d+\.\d*|\.\d+|\d+)([eE][+-]?\d+)?$").unwrap());

pub fn read(path: &Path) -> Result<Value> {
    let content = read_config_text(path)?;
    parse_str(&content)
        .map(Value::Object)
        .map_err(|message| ConfigError::malformed(path, "INI", message))
}

/// Parse INI text. Errors carry a line-numbered message.
pub fn parse_str(content: &str) -> std::result::Result<Map<String, Value>, String> {
    let mut root = Map::new();
    let mut section: Option<String> = None;

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(caps) = SECTION.captures(line) {
            let name = caps[1].to_string();
            root.entry(name.clone()).or_insert_with(|| Value::Object(Map::new()));
            section = Some(name);
            continue;
        }

        let Some(caps) = ENTRY.captures(line) else {
            return Err(format!("line {}: expected `key = value`, found `{}`", idx + 1, line));
        };
        let key = caps[1].trim().to_string();
        let subkey = caps.get(2).map(|m| m.as_str().to_string());
        let value = scan_value(&caps[3]).map_err(|e| format!("line {}: {}", idx + 1, e))?;

        let target = match &section {
            Some(name) => match root.get_mut(name) {
                Some(Value::Object(map)) => map,
                _ => return Err(format!("line {}: section `{}` is not a mapping", idx + 1, name)),
            },
            None => &mut root,
        };
        insert_entry(target, key, subkey, value).map_err(|e| format!("line {}: {}", idx + 1, e))?;
    }

    Ok(root)
}

fn insert_entry(
    target: &mut Map<String, Value>,
    key: String,
    subkey: Option<String>,
    value: Value,
) -> std::result::Result<(), String> {
    match subkey {
        None => {
            target.insert(key, value);
        }
        Some(sub) if sub.is_empty() => {
            let slot = target.entry(key.clone()).or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(value),
                _ => return Err(format!("`{key}[]` conflicts with scalar `{key}`")),
            }
        }
        Some(sub) => {
            let slot = target.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()));
            match slot {
                Value::Object(map) => {
                    map.insert(sub, value);
                }
                _ => return Err(format!("`{key}[{sub}]` conflicts with scalar `{key}`")),
            }
        }
    }
    Ok(())
}

fn scan_value(raw: &str) -> std::result::Result<Value, String> {
    let raw = raw.trim();

    if let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let rest = &raw[1..];
        let Some(end) = rest.find(quote) else {
            return Err("unterminated quoted value".to_string());
        };
        let trailing = rest[end + 1..].trim();
        if !trailing.is_empty() && !trailing.starts_with(';') && !trailing.starts_with('#') {
            return Err(format!("unexpected text after quoted value: `{trailing}`"));
        }
        return Ok(Value::String(rest[..end].to_string()));
    }

    // Inline comments only apply to unquoted values.
    let value = match raw.find(';') {
        Some(pos) => raw[..pos].trim_end(),
        None => raw,
    };
    Ok(coerce(value))
}

fn coerce(value: &str) -> Value {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => return Value::Bool(true),
        "false" | "off" | "no" | "none" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if INTEGER.is_match(value) {
        if let Ok(i) = value.parse::<i64>() {
            return Value::Number(i.into());
        }
        return Value::String(value.to_string());
    }

    if DECIMAL.is_match(value) {
        if let Some(n) = value.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(value.to_string())
}
