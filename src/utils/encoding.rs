//! Text decoding for config files.
//!
//! Config files are usually UTF-8, but editors on some platforms still write
//! a BOM or UTF-16. Decoding order:
//! 1. BOM markers (UTF-8, UTF-16 LE/BE)
//! 2. Strict UTF-8
//! 3. Encoding guessed by chardetng, decoded with replacement

use crate::error::{ConfigError, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::path::Path;

/// Read `path` and decode it to a `String`.
///
/// A missing file is reported as [`ConfigError::NotFound`].
pub fn read_config_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| ConfigError::from_read(path, e))?;
    Ok(decode_bytes(&bytes))
}

/// Decode raw bytes using BOM sniffing, then strict UTF-8, then detection.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (decoded, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    tracing::debug!("Decoding non-UTF-8 config text as {}", encoding.name());
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}
