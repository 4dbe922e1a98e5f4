//! TOML reader

use crate::error::{ConfigError, Result};
use crate::utils::read_config_text;
use serde_json::{Map, Number, Value};
use std::path::Path;

pub fn read(path: &Path) -> Result<Value> {
    let content = read_config_text(path)?;
    let table: ::toml::Table =
        ::toml::from_str(&content).map_err(|e| ConfigError::malformed(path, "TOML", e.message()))?;
    Ok(table_to_json(table))
}

fn table_to_json(table: ::toml::Table) -> Value {
    let map: Map<String, Value> = table.into_iter().map(|(k, v)| (k, to_json(v))).collect();
    Value::Object(map)
}

fn to_json(value: ::toml::Value) -> Value {
    match value {
        ::toml::Value::String(s) => Value::String(s),
        ::toml::Value::Integer(i) => Value::Number(i.into()),
        // NaN and infinities have no JSON representation
        ::toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ::toml::Value::Boolean(b) => Value::Bool(b),
        ::toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        ::toml::Value::Array(items) => Value::Array(items.into_iter().map(to_json).collect()),
        ::toml::Value::Table(table) => table_to_json(table),
    }
}
