//! Load orchestration: cache for static files, fresh reads for dynamic ones.

use super::discovery::{Discovered, FileDiscovery};
use crate::cache::{signature, CacheStatus, CacheStore};
use crate::domain::{config_key, ClassifiedFile, ConfigTree, DynamicOutcome, LoadStats};
use crate::error::{ConfigError, Result};
use crate::format::ReaderRegistry;
use crate::tree::{overlay, resolve};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Whether the merged tree has been computed for this repository.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadState<'a> {
    Unloaded,
    Loaded(&'a ConfigTree),
}

/// A config directory backed by a [`CacheStore`].
///
/// The first [`load`](Self::load) computes the merged tree; later calls
/// return it without touching disk until [`clear_cache`](Self::clear_cache),
/// [`add_excluded_file`](Self::add_excluded_file) or
/// [`invalidate`](Self::invalidate) resets the state.
#[derive(Debug)]
pub struct ConfigRepository {
    config_dir: PathBuf,
    files: Option<Vec<PathBuf>>,
    excluded: Vec<String>,
    registry: ReaderRegistry,
    store: CacheStore,
    loaded: Option<ConfigTree>,
    stats: LoadStats,
}

impl ConfigRepository {
    pub fn new(config_dir: impl Into<PathBuf>, store: CacheStore) -> Self {
        Self {
            config_dir: config_dir.into(),
            files: None,
            excluded: Vec::new(),
            registry: ReaderRegistry::new(),
            store,
            loaded: None,
            stats: LoadStats::default(),
        }
    }

    /// Load exactly these static files instead of scanning the directory.
    /// Relative paths are taken relative to the config directory.
    pub fn files(mut self, files: Vec<PathBuf>) -> Self {
        self.files = Some(files);
        self
    }

    /// File names (with extension, case-insensitive) kept out of the cache.
    pub fn excluded_files<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.push_excluded(name.into());
        }
        self
    }

    pub fn registry(mut self, registry: ReaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn excluded(&self) -> &[String] {
        &self.excluded
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn state(&self) -> LoadState<'_> {
        match &self.loaded {
            Some(tree) => LoadState::Loaded(tree),
            None => LoadState::Unloaded,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// The merged configuration, loading it on first use.
    pub fn load(&mut self) -> Result<&ConfigTree> {
        let tree = match self.loaded.take() {
            Some(tree) => tree,
            None => self.load_fresh()?,
        };
        Ok(&*self.loaded.insert(tree))
    }

    /// Resolve a dotted key, falling back to `default` when it is absent.
    pub fn get(&mut self, key: &str, default: Value) -> Result<Value> {
        let tree = self.load()?;
        Ok(resolve(tree, key, default))
    }

    /// Delete the cache record and forget the merged tree.
    pub fn clear_cache(&mut self) -> Result<()> {
        self.store.clear()?;
        self.loaded = None;
        Ok(())
    }

    /// Forget the merged tree but keep the cache record; the next load
    /// revalidates the cache and re-reads dynamic files.
    pub fn invalidate(&mut self) {
        self.loaded = None;
    }

    /// Move `name` into the dynamic set. Returns whether it was newly added.
    ///
    /// The cache is cleared either way so it cannot keep serving the file
    /// as static data.
    pub fn add_excluded_file(&mut self, name: &str) -> Result<bool> {
        let added = self.push_excluded(name.to_string());
        self.clear_cache()?;
        Ok(added)
    }

    /// Every candidate file with its class.
    pub fn classify(&self) -> Result<Vec<ClassifiedFile>> {
        Ok(self.discover()?.classified())
    }

    /// Cache state for the current static file set, without side effects.
    pub fn cache_status(&self) -> Result<CacheStatus> {
        let discovered = self.discover()?;
        Ok(self.store.status(&discovered.static_files))
    }

    fn push_excluded(&mut self, name: String) -> bool {
        if self.excluded.iter().any(|ex| ex.eq_ignore_ascii_case(&name)) {
            return false;
        }
        self.excluded.push(name);
        true
    }

    fn discover(&self) -> Result<Discovered> {
        FileDiscovery::new(&self.config_dir, &self.registry)
            .files(self.files.as_deref())
            .excluded(&self.excluded)
            .discover()
    }

    fn load_fresh(&mut self) -> Result<ConfigTree> {
        self.stats.loads += 1;
        self.stats.scans += 1;
        let discovered = self.discover()?;

        let mut tree = self.load_static(&discovered.static_files)?;
        let dynamic = self.load_dynamic(&discovered.dynamic_files)?;
        overlay(&mut tree, dynamic);

        tracing::debug!(
            "Loaded {} config entries from {} ({} static, {} dynamic files)",
            tree.len(),
            self.config_dir.display(),
            discovered.static_files.len(),
            discovered.dynamic_files.len()
        );
        Ok(tree)
    }

    fn load_static(&mut self, files: &[PathBuf]) -> Result<ConfigTree> {
        // Taken before parsing so an edit made meanwhile invalidates the record.
        let current = signature(files);
        if let Some(cached) = self.store.get_with_signature(&current) {
            self.stats.cache_hits += 1;
            return Ok(cached);
        }
        self.stats.cache_misses += 1;

        let mut tree = ConfigTree::new();
        for path in files {
            let reader = self.registry.require(path)?;
            let parsed = reader.parse_mapping(path)?;
            self.stats.static_parses += 1;
            if let Some(key) = config_key(path) {
                tree.insert(key, Value::Object(parsed));
            }
        }

        self.store.put_with_signature(current, &tree)?;
        Ok(tree)
    }

    fn load_dynamic(&mut self, files: &[PathBuf]) -> Result<ConfigTree> {
        let mut tree = ConfigTree::new();
        for path in files {
            let Some(reader) = self.registry.lookup(path) else {
                continue;
            };
            self.stats.dynamic_parses += 1;
            let outcome = match reader.parse_dynamic(path) {
                Ok(outcome) => outcome,
                Err(ConfigError::NotFound(_)) => {
                    tracing::debug!("Dynamic config {} disappeared before reading", path.display());
                    self.stats.dynamic_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match outcome {
                DynamicOutcome::Config(map) => {
                    if let Some(key) = config_key(path) {
                        tree.insert(key, Value::Object(map));
                    }
                }
                DynamicOutcome::NotConfig => {
                    tracing::debug!("Skipping {}: not a config mapping", path.display());
                    self.stats.dynamic_skipped += 1;
                }
                DynamicOutcome::ParseError(message) => {
                    tracing::warn!(
                        "Skipping unparsable dynamic config {}: {}",
                        path.display(),
                        message
                    );
                    self.stats.dynamic_skipped += 1;
                }
            }
        }
        Ok(tree)
    }
}
