//! Candidate file discovery and static/dynamic classification.

use crate::domain::{extension_of, ClassifiedFile, FileClass};
use crate::error::{ConfigError, Result};
use crate::format::ReaderRegistry;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files taking part in one load, partitioned by class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Cacheable files, in signature order.
    pub static_files: Vec<PathBuf>,
    /// Excluded files that exist and have a reader, in exclusion-list order.
    pub dynamic_files: Vec<PathBuf>,
    /// Files skipped for lack of a reader.
    pub ignored: Vec<PathBuf>,
}

impl Discovered {
    pub fn classified(&self) -> Vec<ClassifiedFile> {
        let tag = |files: &[PathBuf], class: FileClass| {
            files
                .iter()
                .map(|path| ClassifiedFile { path: path.clone(), class })
                .collect::<Vec<_>>()
        };
        let mut all = tag(&self.static_files, FileClass::Static);
        all.extend(tag(&self.dynamic_files, FileClass::Dynamic));
        all.extend(tag(&self.ignored, FileClass::Ignored));
        all
    }
}

/// Resolves the static and dynamic file sets of a config directory.
pub struct FileDiscovery<'a> {
    config_dir: &'a Path,
    files: Option<&'a [PathBuf]>,
    excluded: &'a [String],
    registry: &'a ReaderRegistry,
}

impl<'a> FileDiscovery<'a> {
    pub fn new(config_dir: &'a Path, registry: &'a ReaderRegistry) -> Self {
        Self { config_dir, files: None, excluded: &[], registry }
    }

    /// Use an explicit static file list instead of scanning the directory.
    pub fn files(mut self, files: Option<&'a [PathBuf]>) -> Self {
        self.files = files;
        self
    }

    /// File names (with extension) that are never cached.
    pub fn excluded(mut self, excluded: &'a [String]) -> Self {
        self.excluded = excluded;
        self
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.excluded.iter().any(|ex| ex.eq_ignore_ascii_case(name))
    }

    /// Classify every candidate file.
    pub fn discover(&self) -> Result<Discovered> {
        let mut discovered = Discovered::default();

        match self.files {
            Some(files) => {
                for file in files {
                    let path = self.normalize(file);
                    if self.is_excluded(&path) {
                        continue;
                    }
                    // Explicitly named files must have a reader.
                    self.registry.require(&path)?;
                    discovered.static_files.push(path);
                }
            }
            None => {
                for path in self.scan()? {
                    if self.is_excluded(&path) {
                        continue;
                    }
                    if self.registry.supports(&path) {
                        discovered.static_files.push(path);
                    } else {
                        tracing::debug!(
                            "Skipping {} (no reader for '.{}')",
                            path.display(),
                            extension_of(&path)
                        );
                        discovered.ignored.push(path);
                    }
                }
            }
        }

        for name in self.excluded {
            let Some(path) = self.find_excluded(name) else {
                continue;
            };
            if self.registry.supports(&path) {
                discovered.dynamic_files.push(path);
            } else {
                discovered.ignored.push(path);
            }
        }

        Ok(discovered)
    }

    fn normalize(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.config_dir.join(file)
        }
    }

    /// Regular files directly inside the config directory, sorted by name.
    fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.config_dir.is_dir() {
            return Err(ConfigError::NotFound(self.config_dir.to_path_buf()));
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(self.config_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        for entry in walker {
            let entry = entry.map_err(|e| ConfigError::Io {
                path: self.config_dir.to_path_buf(),
                source: e.into(),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Locate an excluded file, matching its name case-insensitively.
    fn find_excluded(&self, name: &str) -> Option<PathBuf> {
        let entries = std::fs::read_dir(self.config_dir).ok()?;
        let mut matches: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .collect();
        matches.sort();
        matches.into_iter().next()
    }
}
