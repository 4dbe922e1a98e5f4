//! YAML reader

use crate::error::{ConfigError, Result};
use crate::utils::read_config_text;
use serde_json::{Map, Number, Value};
use std::path::Path;

pub fn read(path: &Path) -> Result<Value> {
    let content = read_config_text(path)?;
    let raw: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::malformed(path, "YAML", e))?;

    // An empty document is an empty config rather than a scalar null.
    if raw.is_null() {
        return Ok(Value::Object(Map::new()));
    }
    Ok(to_json(raw))
}

fn to_json(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => number_to_json(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => {
            Value::Array(items.into_iter().map(to_json).collect())
        }
        serde_yaml::Value::Mapping(mapping) => {
            let map: Map<String, Value> =
                mapping.into_iter().map(|(k, v)| (key_to_string(k), to_json(v))).collect();
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => to_json(tagged.value),
    }
}

fn number_to_json(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else {
        n.as_f64().and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        other => serde_yaml::to_string(&other).unwrap_or_default().trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_yaml_mapping() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.yaml");
        fs::write(&path, "driver: redis\nttl: 60\nhosts:\n  - a\n  - b\n200: ok\n").unwrap();

        let value = read(&path).unwrap();
        assert_eq!(value["driver"], json!("redis"));
        assert_eq!(value["ttl"], json!(60));
        assert_eq!(value["hosts"], json!(["a", "b"]));
        assert_eq!(value["200"], json!("ok"));
    }

    #[test]
    fn test_empty_yaml_is_empty_mapping() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.yml");
        fs::write(&path, "").unwrap();

        assert_eq!(read(&path).unwrap(), json!({}));
    }

    #[test]
    fn test_route_list_is_not_a_mapping() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("routes.yaml");
        fs::write(&path, "- path: /\n  handler: home\n").unwrap();

        assert!(read(&path).unwrap().is_array());
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.yaml");
        fs::write(&path, "key: [unclosed\n").unwrap();

        assert!(matches!(read(&path), Err(ConfigError::MalformedContent { .. })));
    }
}
