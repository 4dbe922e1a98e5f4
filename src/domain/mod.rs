//! Core types shared by the readers, the cache store and the repository.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Merged configuration: file stem -> parsed file content.
pub type ConfigTree = Map<String, Value>;

/// How a candidate file takes part in a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileClass {
    /// Cacheable; tracked by the cache signature.
    Static,
    /// Excluded from caching; parsed on every load.
    Dynamic,
    /// No reader registered for the extension.
    Ignored,
}

impl fmt::Display for FileClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileClass::Static => "static",
            FileClass::Dynamic => "dynamic",
            FileClass::Ignored => "ignored",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedFile {
    pub path: PathBuf,
    pub class: FileClass,
}

/// Result of reading an excluded (dynamic) file.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicOutcome {
    Config(ConfigTree),
    /// The document parsed but is not a mapping (a route list, for instance).
    NotConfig,
    ParseError(String),
}

/// Counters describing the work done by a repository since construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub loads: usize,
    pub scans: usize,
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub static_parses: usize,
    pub dynamic_parses: usize,
    pub dynamic_skipped: usize,
}

/// Strip the extension from a file name, returning the merged-tree key.
pub fn config_key(path: &std::path::Path) -> Option<String> {
    path.file_stem().and_then(|s| s.to_str()).map(str::to_string)
}

/// Lowercase extension of `path`, empty when there is none.
pub fn extension_of(path: &std::path::Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase()
}
