//! Persistent cache for the static configuration set.
//!
//! A [`CacheStore`] keeps one record on disk: the parsed data plus a
//! signature of the files it was parsed from. A record is served only while
//! the signature still matches the files on disk and its age is within TTL;
//! anything else (changed files, expiry, corrupt payload) deletes the record.

pub mod location;
pub mod lock;
pub mod signature;
pub mod store;

pub use location::CacheLocationPolicy;
pub use signature::signature;
pub use store::{CacheRecord, CacheStatus, CacheStore, Invalidation, CACHE_FORMAT_VERSION};
