//! Shared helpers: text decoding, hashing, path handling.

pub mod encoding;
pub mod hashing;
pub mod paths;

pub use encoding::read_config_text;
pub use hashing::stable_hash;
pub use paths::{absolutize, normalize_lexically, resolve_through_existing};
