//! Config directory loading with a validated cache

pub mod discovery;
pub mod repository;

pub use discovery::{Discovered, FileDiscovery};
pub use repository::{ConfigRepository, LoadState};
