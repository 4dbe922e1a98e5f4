//! confcache: load a directory of config files into one merged tree.
//!
//! Files in a config directory (JSON, TOML, YAML, INI) are parsed and merged
//! under their file stem. The static part of the configuration is cached on
//! disk and served while the files it came from are unchanged; excluded
//! (dynamic) files are read fresh on every load.
//!
//! ```no_run
//! use confcache::{CacheStore, ConfigRepository};
//! use serde_json::json;
//!
//! # fn main() -> confcache::Result<()> {
//! let store = CacheStore::new("var/cache/config.json", 3600)?;
//! let mut repo = ConfigRepository::new("config", store).excluded_files(["routes.yaml"]);
//! let host = repo.get("database.host", json!("127.0.0.1"))?;
//! # let _ = host;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod format;
pub mod loader;
pub mod tree;
pub mod utils;

pub use cache::{CacheLocationPolicy, CacheStatus, CacheStore};
pub use domain::{ClassifiedFile, ConfigTree, DynamicOutcome, FileClass, LoadStats};
pub use error::{ConfigError, Result};
pub use format::{BuiltinFormat, FormatReader, ReaderRegistry};
pub use loader::{ConfigRepository, LoadState};
