//! Settings for the confcache tool itself.

use crate::cache::CacheStore;
use crate::error::Result;
use crate::loader::ConfigRepository;
use crate::utils::absolutize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_CACHE_FILE: &str = ".confcache/config.cache.json";
pub const DEFAULT_TTL_SECS: i64 = 3600;

pub fn default_excluded_files() -> Vec<String> {
    ["routes.yaml", "routes.yml", "routes.json"].iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the config files.
    pub config_dir: PathBuf,
    /// Cache backing file.
    pub cache_file: PathBuf,
    /// Maximum cache age in seconds; zero or negative never expires.
    pub ttl_secs: i64,
    /// File names that are parsed on every load and never cached.
    pub excluded_files: Vec<String>,
    /// Explicit static file list; `None` scans `config_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<PathBuf>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            cache_file: PathBuf::from(DEFAULT_CACHE_FILE),
            ttl_secs: DEFAULT_TTL_SECS,
            excluded_files: default_excluded_files(),
            files: None,
        }
    }
}

impl Settings {
    /// Build a repository, resolving relative paths against `base_dir`.
    pub fn open_repository(&self, base_dir: &Path) -> Result<ConfigRepository> {
        let store = CacheStore::new(absolutize(&self.cache_file, base_dir), self.ttl_secs)?;
        let mut repo = ConfigRepository::new(absolutize(&self.config_dir, base_dir), store)
            .excluded_files(self.excluded_files.iter().cloned());
        if let Some(files) = &self.files {
            repo = repo.files(files.clone());
        }
        Ok(repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.ttl_secs, 3600);
        assert!(settings.excluded_files.contains(&"routes.yaml".to_string()));
        assert!(settings.files.is_none());
    }

    #[test]
    fn test_cache_under_temp_dir_is_rejected() {
        let base = tempfile::TempDir::new().unwrap();
        let err = Settings::default().open_repository(base.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidCacheLocation { .. }), "unexpected error: {err}");
        assert!(!base.path().join(".confcache").exists());
    }
}
