//! Signature-validated cache file.

use super::location::CacheLocationPolicy;
use super::lock::WriteLock;
use super::signature::signature;
use crate::domain::ConfigTree;
use crate::error::{ConfigError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// On-disk payload format version.
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// The persisted unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheRecord {
    pub version: u32,
    pub signature: String,
    pub created_at: DateTime<Utc>,
    pub data: ConfigTree,
}

/// Why a cache record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    Unreadable,
    Corrupt,
    VersionMismatch,
    SignatureMismatch,
    Expired,
}

impl fmt::Display for Invalidation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Invalidation::Unreadable => "unreadable",
            Invalidation::Corrupt => "corrupt payload",
            Invalidation::VersionMismatch => "payload version mismatch",
            Invalidation::SignatureMismatch => "tracked files changed",
            Invalidation::Expired => "older than TTL",
        };
        f.write_str(reason)
    }
}

/// Result of inspecting the cache without side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheStatus {
    Absent,
    Valid { created_at: DateTime<Utc>, age_secs: i64 },
    Stale(Invalidation),
}

/// A single cache file holding the parsed static configuration.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
    ttl_secs: i64,
}

impl CacheStore {
    /// Open a store at `path` using the default location policy.
    ///
    /// `ttl_secs <= 0` disables age-based expiry.
    pub fn new(path: impl AsRef<Path>, ttl_secs: i64) -> Result<Self> {
        Self::with_policy(path, ttl_secs, &CacheLocationPolicy::system_default())
    }

    pub fn with_policy(
        path: impl AsRef<Path>,
        ttl_secs: i64,
        policy: &CacheLocationPolicy,
    ) -> Result<Self> {
        let path = policy.validate(path.as_ref())?;
        Ok(Self { path, ttl_secs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Cached data for `tracked`, or `None` after deleting any stale record.
    pub fn get(&self, tracked: &[PathBuf]) -> Option<ConfigTree> {
        self.get_with_signature(&signature(tracked))
    }

    pub(crate) fn get_with_signature(&self, current: &str) -> Option<ConfigTree> {
        match self.inspect(current) {
            Inspection::Absent => None,
            Inspection::Valid(record) => {
                tracing::debug!("Cache hit: {}", self.path.display());
                Some(record.data)
            }
            Inspection::Stale(reason) => {
                tracing::debug!("Invalidating cache {} ({})", self.path.display(), reason);
                if let Err(e) = self.clear() {
                    tracing::debug!("Failed to delete stale cache: {}", e);
                }
                None
            }
        }
    }

    /// Persist `data` under the current signature of `tracked`.
    pub fn put(&self, tracked: &[PathBuf], data: &ConfigTree) -> Result<()> {
        self.put_with_signature(signature(tracked), data)
    }

    /// Persist `data` under a signature taken before the files were parsed,
    /// so an edit made while parsing leaves a record that no longer matches.
    pub(crate) fn put_with_signature(&self, signature: String, data: &ConfigTree) -> Result<()> {
        let record = CacheRecord {
            version: CACHE_FORMAT_VERSION,
            signature,
            created_at: Utc::now(),
            data: data.clone(),
        };
        let payload = serde_json::to_vec_pretty(&record)
            .map_err(|e| ConfigError::cache_write(&self.path, io::Error::other(e)))?;

        self.commit_with(|file| stage(file, &payload))?;
        tracing::info!(
            "Wrote config cache {} ({} entries, {} bytes)",
            self.path.display(),
            data.len(),
            payload.len()
        );
        Ok(())
    }

    /// Replace the cache file with whatever `fill` writes.
    ///
    /// Writers serialize on a sibling lock file. The new content goes to a
    /// sibling temp file that is synced, restricted to the owner and renamed
    /// over the cache file, so readers see the old record or the complete
    /// new one. On failure the temp file is removed and the old record stays.
    fn commit_with<F>(&self, fill: F) -> Result<()>
    where
        F: FnOnce(&mut fs::File) -> io::Result<()>,
    {
        let fail = |e: io::Error| ConfigError::cache_write(&self.path, e);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(fail)?;
        }

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.sibling("lock"))
            .map_err(fail)?;
        let lock = WriteLock::acquire(&lock_file).map_err(fail)?;

        let temp = self.sibling("tmp");
        if let Err(e) = replace_with(&temp, &self.path, fill) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                tracing::debug!("Failed to remove partial cache {}: {}", temp.display(), cleanup);
            }
            return Err(fail(e));
        }

        lock.release().map_err(fail)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }

    /// Delete the cache file. Succeeds when it does not exist.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Cleared config cache {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::Io { path: self.path.clone(), source: e }),
        }
    }

    /// Report whether a valid record exists for `tracked` without touching it.
    pub fn status(&self, tracked: &[PathBuf]) -> CacheStatus {
        match self.inspect(&signature(tracked)) {
            Inspection::Absent => CacheStatus::Absent,
            Inspection::Valid(record) => CacheStatus::Valid {
                created_at: record.created_at,
                age_secs: (Utc::now() - record.created_at).num_seconds(),
            },
            Inspection::Stale(reason) => CacheStatus::Stale(reason),
        }
    }

    fn inspect(&self, current: &str) -> Inspection {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Inspection::Absent,
            Err(_) => return Inspection::Stale(Invalidation::Unreadable),
        };

        let record: CacheRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(_) => return Inspection::Stale(Invalidation::Corrupt),
        };

        if record.version != CACHE_FORMAT_VERSION {
            return Inspection::Stale(Invalidation::VersionMismatch);
        }
        if record.signature != current {
            return Inspection::Stale(Invalidation::SignatureMismatch);
        }
        if self.ttl_secs > 0 && (Utc::now() - record.created_at).num_seconds() > self.ttl_secs {
            return Inspection::Stale(Invalidation::Expired);
        }

        Inspection::Valid(record)
    }
}

enum Inspection {
    Absent,
    Valid(CacheRecord),
    Stale(Invalidation),
}

/// Create `temp`, let `fill` write it, sync, restrict, then rename it over `target`.
fn replace_with<F>(temp: &Path, target: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut fs::File) -> io::Result<()>,
{
    let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(temp)?;
    restrict_permissions(temp)?;
    fill(&mut file)?;
    file.sync_all()?;
    drop(file);
    fs::rename(temp, target)
}

/// Write all of `payload`; a short write is a `WriteZero` error.
fn stage<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<()> {
    let written = write_payload(writer, payload)?;
    if written != payload.len() {
        return Err(io::Error::new(
            io::ErrorKind::WriteZero,
            format!("short write: {} of {} bytes", written, payload.len()),
        ));
    }
    writer.flush()
}

/// Write as much of `payload` as the writer accepts and report the count.
fn write_payload<W: Write>(writer: &mut W, payload: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < payload.len() {
        match writer.write(&payload[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
