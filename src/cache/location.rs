//! Cache location safety checks.
//!
//! The cache holds parsed configuration, which often includes secrets. It must
//! not live somewhere ephemeral (the system temp directory) or somewhere a web
//! server may hand it out (a document root).

use crate::error::{ConfigError, Result};
use crate::utils::{absolutize, resolve_through_existing};
use std::path::{Path, PathBuf};

const COMMON_WEB_ROOTS: &[&str] = &["/var/www", "/srv/www", "/usr/share/nginx/html"];

/// Directory trees a cache file may not be placed under.
#[derive(Debug, Clone, Default)]
pub struct CacheLocationPolicy {
    forbidden: Vec<(PathBuf, &'static str)>,
}

impl CacheLocationPolicy {
    /// Policy with no forbidden roots.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The system temp directory, `$DOCUMENT_ROOT` and common web roots.
    pub fn system_default() -> Self {
        let mut policy = Self::empty().forbid_temp_dir();
        if let Some(doc_root) = std::env::var_os("DOCUMENT_ROOT").filter(|v| !v.is_empty()) {
            policy = policy.forbid_web_root(PathBuf::from(doc_root));
        }
        for root in COMMON_WEB_ROOTS {
            policy = policy.forbid_web_root(PathBuf::from(root));
        }
        policy
    }

    pub fn forbid_temp_dir(mut self) -> Self {
        self.forbidden.push((std::env::temp_dir(), "inside the system temp directory"));
        self
    }

    pub fn forbid_web_root(mut self, root: PathBuf) -> Self {
        self.forbidden.push((root, "inside a web document root"));
        self
    }

    /// Validate `path` and return its absolute, normalized form.
    ///
    /// Performs metadata lookups only; nothing is created or written.
    pub fn validate(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::invalid_location(path, "path is empty"));
        }

        let cwd = std::env::current_dir().map_err(|e| {
            ConfigError::invalid_location(path, format!("cannot resolve working directory: {e}"))
        })?;
        let absolute = absolutize(path, &cwd);
        let resolved = resolve_through_existing(&absolute);

        if resolved.is_dir() {
            return Err(ConfigError::invalid_location(path, "path is a directory"));
        }

        for (root, reason) in &self.forbidden {
            let root = resolve_through_existing(&absolutize(root, &cwd));
            if resolved.starts_with(&root) {
                return Err(ConfigError::invalid_location(path, *reason));
            }
        }

        Ok(absolute)
    }
}
