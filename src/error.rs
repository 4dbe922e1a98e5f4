//! Error types for confcache

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Malformed {format} content in {}: {message}", .path.display())]
    MalformedContent { path: PathBuf, format: &'static str, message: String },

    #[error("Failed to write cache file {}: {source}", .path.display())]
    CacheWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid cache location {}: {reason}", .path.display())]
    InvalidCacheLocation { path: PathBuf, reason: String },

    #[error("Unsupported config extension '.{extension}' for file {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("Failed reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn malformed(path: &Path, format: &'static str, message: impl ToString) -> Self {
        Self::MalformedContent { path: path.to_path_buf(), format, message: message.to_string() }
    }

    pub fn cache_write(path: &Path, source: std::io::Error) -> Self {
        Self::CacheWriteFailure { path: path.to_path_buf(), source }
    }

    pub fn invalid_location(path: &Path, reason: impl Into<String>) -> Self {
        Self::InvalidCacheLocation { path: path.to_path_buf(), reason: reason.into() }
    }

    /// Map an I/O error from reading `path`, turning a missing file into `NotFound`.
    pub fn from_read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.to_path_buf())
        } else {
            Self::Io { path: path.to_path_buf(), source }
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
