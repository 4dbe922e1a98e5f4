//! File signatures: a digest of (path, mtime, size) for each tracked file.

use crate::utils::stable_hash;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

const PART_SEPARATOR: &str = ";";

/// Digest over the identity, timestamp and size of an ordered file list.
///
/// Changing a file's mtime or size, adding, removing or reordering files all
/// change the signature. File contents are never read.
pub fn signature(files: &[PathBuf]) -> String {
    let parts: Vec<String> = files.iter().map(|path| signature_part(path)).collect();
    stable_hash(&parts, PART_SEPARATOR)
}

fn signature_part(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            let mtime = meta
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_nanos())
                .unwrap_or(0);
            format!("{}|{}|{}", path.display(), mtime, meta.len())
        }
        _ => format!("{}|0|0", path.display()),
    }
}
