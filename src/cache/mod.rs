//! Cache Module
//!
//! Provides a size-bounded disk cache with LRU eviction.

pub mod blob;
mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::Entry;
pub use lru::LruIndex;
pub use stats::CacheStats;
pub use store::DiskCache;
