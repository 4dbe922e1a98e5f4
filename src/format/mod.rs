//! Format readers and the extension registry.
//!
//! Each supported format turns a file into a `serde_json::Value`. The
//! registry maps lowercase extensions to a reader: built-in formats are a
//! fixed set of variants, and callers may register their own readers for
//! additional (or overriding) extensions at construction time.

use crate::domain::{extension_of, ConfigTree, DynamicOutcome};
use crate::error::{ConfigError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub mod ini;
pub mod json;
pub mod toml;
pub mod yaml;

/// Parse a file into a document.
///
/// Implementations fail with [`ConfigError::NotFound`] when the file is
/// missing and [`ConfigError::MalformedContent`] when it cannot be decoded.
pub trait FormatReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<Value>;
}

/// Formats understood out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFormat {
    Json,
    Toml,
    Yaml,
    Ini,
}

impl BuiltinFormat {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinFormat::Json => "JSON",
            BuiltinFormat::Toml => "TOML",
            BuiltinFormat::Yaml => "YAML",
            BuiltinFormat::Ini => "INI",
        }
    }

    fn extensions(self) -> &'static [&'static str] {
        match self {
            BuiltinFormat::Json => &["json"],
            BuiltinFormat::Toml => &["toml"],
            BuiltinFormat::Yaml => &["yaml", "yml"],
            BuiltinFormat::Ini => &["ini"],
        }
    }

    const ALL: [BuiltinFormat; 4] =
        [BuiltinFormat::Json, BuiltinFormat::Toml, BuiltinFormat::Yaml, BuiltinFormat::Ini];
}

impl FormatReader for BuiltinFormat {
    fn read(&self, path: &Path) -> Result<Value> {
        match self {
            BuiltinFormat::Json => json::read(path),
            BuiltinFormat::Toml => toml::read(path),
            BuiltinFormat::Yaml => yaml::read(path),
            BuiltinFormat::Ini => ini::read(path),
        }
    }
}

/// A registry entry.
#[derive(Clone)]
pub enum Reader {
    Builtin(BuiltinFormat),
    Custom(Arc<dyn FormatReader>),
}

impl Reader {
    pub fn read(&self, path: &Path) -> Result<Value> {
        match self {
            Reader::Builtin(format) => format.read(path),
            Reader::Custom(reader) => reader.read(path),
        }
    }

    fn format_name(&self) -> &'static str {
        match self {
            Reader::Builtin(format) => format.name(),
            Reader::Custom(_) => "custom",
        }
    }

    /// Parse `path` and require a mapping at the top level.
    pub fn parse_mapping(&self, path: &Path) -> Result<ConfigTree> {
        match self.read(path)? {
            Value::Object(map) => Ok(map),
            other => Err(ConfigError::malformed(
                path,
                self.format_name(),
                format!("expected a mapping at the top level, found {}", value_kind(&other)),
            )),
        }
    }

    /// Parse an excluded file, classifying the result instead of failing.
    ///
    /// A missing file surfaces as an error since callers check existence first.
    pub fn parse_dynamic(&self, path: &Path) -> Result<DynamicOutcome> {
        match self.read(path) {
            Ok(Value::Object(map)) => Ok(DynamicOutcome::Config(map)),
            Ok(_) => Ok(DynamicOutcome::NotConfig),
            Err(ConfigError::MalformedContent { message, .. }) => {
                Ok(DynamicOutcome::ParseError(message))
            }
            Err(e) => Err(e),
        }
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reader::Builtin(format) => f.debug_tuple("Builtin").field(format).finish(),
            Reader::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Extension -> reader lookup table.
#[derive(Debug, Clone)]
pub struct ReaderRegistry {
    readers: BTreeMap<String, Reader>,
}

impl ReaderRegistry {
    /// Registry with every built-in format.
    pub fn new() -> Self {
        let mut readers = BTreeMap::new();
        for format in BuiltinFormat::ALL {
            for ext in format.extensions() {
                readers.insert((*ext).to_string(), Reader::Builtin(format));
            }
        }
        Self { readers }
    }

    /// Register (or replace) the reader for `extension`.
    pub fn with_reader(mut self, extension: &str, reader: Arc<dyn FormatReader>) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        self.readers.insert(ext, Reader::Custom(reader));
        self
    }

    pub fn lookup(&self, path: &Path) -> Option<&Reader> {
        self.readers.get(&extension_of(path))
    }

    pub fn supports(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    /// Reader for a file the caller asked for by name.
    pub fn require(&self, path: &Path) -> Result<&Reader> {
        self.lookup(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: extension_of(path),
        })
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.readers.keys().map(String::as_str)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    struct Fixed(Value);

    impl FormatReader for Fixed {
        fn read(&self, _path: &Path) -> Result<Value> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_registry_dispatches_by_extension() {
        let registry = ReaderRegistry::new();
        assert!(matches!(
            registry.lookup(Path::new("a.YML")),
            Some(Reader::Builtin(BuiltinFormat::Yaml))
        ));
        assert!(registry.lookup(Path::new("routes.php")).is_none());
    }

    #[test]
    fn test_require_reports_unsupported_format() {
        let registry = ReaderRegistry::new();
        let err = registry.require(Path::new("routes.php")).unwrap_err();
        match err {
            ConfigError::UnsupportedFormat { extension, .. } => assert_eq!(extension, "php"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_reader_overrides_builtin() {
        let registry =
            ReaderRegistry::new().with_reader(".JSON", Arc::new(Fixed(json!({"fixed": true}))));
        let reader = registry.lookup(Path::new("x.json")).unwrap();
        let tree = reader.parse_mapping(Path::new("x.json")).unwrap();
        assert_eq!(tree.get("fixed"), Some(&json!(true)));
    }

    #[test]
    fn test_parse_mapping_rejects_list() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("routes.json");
        fs::write(&path, "[\"/\", \"/about\"]").unwrap();

        let reader = ReaderRegistry::new().require(&path).unwrap().clone();
        assert!(matches!(reader.parse_mapping(&path), Err(ConfigError::MalformedContent { .. })));
        assert_eq!(reader.parse_dynamic(&path).unwrap(), DynamicOutcome::NotConfig);
    }

    #[test]
    fn test_parse_dynamic_classifies_syntax_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("routes.json");
        fs::write(&path, "{ not json").unwrap();

        let reader = ReaderRegistry::new().require(&path).unwrap().clone();
        assert!(matches!(reader.parse_dynamic(&path).unwrap(), DynamicOutcome::ParseError(_)));
    }
}
