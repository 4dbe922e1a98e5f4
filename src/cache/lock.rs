//! Scoped exclusive advisory lock for cache writers.

use fs2::FileExt;
use std::fs::File;
use std::io;

/// Holds an exclusive lock on an open file.
///
/// Call [`WriteLock::release`] once the write is complete; on any early
/// return the lock is released when the guard is dropped.
pub struct WriteLock<'a> {
    file: &'a File,
    held: bool,
}

impl<'a> WriteLock<'a> {
    /// Block until the exclusive lock is acquired.
    pub fn acquire(file: &'a File) -> io::Result<Self> {
        file.lock_exclusive()?;
        Ok(Self { file, held: true })
    }

    pub fn release(mut self) -> io::Result<()> {
        self.held = false;
        FileExt::unlock(self.file)
    }
}

impl Drop for WriteLock<'_> {
    fn drop(&mut self) {
        if self.held {
            if let Err(e) = FileExt::unlock(self.file) {
                tracing::debug!("Failed to release cache write lock: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use tempfile::TempDir;

    fn open(path: &std::path::Path) -> File {
        OpenOptions::new().read(true).write(true).create(true).truncate(false).open(path).unwrap()
    }

    #[test]
    fn lock_is_exclusive_until_released() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let first = open(&path);
        let second = open(&path);

        let guard = WriteLock::acquire(&first).unwrap();
        assert!(second.try_lock_exclusive().is_err());

        guard.release().unwrap();
        second.try_lock_exclusive().unwrap();
        FileExt::unlock(&second).unwrap();
    }

    #[test]
    fn drop_releases_lock() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        let first = open(&path);
        let second = open(&path);

        {
            let _guard = WriteLock::acquire(&first).unwrap();
        }
        second.try_lock_exclusive().unwrap();
        FileExt::unlock(&second).unwrap();
    }
}
