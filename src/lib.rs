//! Mini Diskcache - A size-bounded, disk-backed blob cache
//!
//! Stores byte payloads as one file per key under a directory and evicts
//! least recently used entries when a write would exceed the capacity.

pub mod cache;
pub mod config;
pub mod error;
pub mod handle;

pub use cache::{CacheStats, DiskCache, Entry};
pub use config::Config;
pub use error::{CacheError, Result};
pub use handle::SharedCache;
