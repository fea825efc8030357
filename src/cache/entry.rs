//! Cache Entry Module
//!
//! Defines the metadata kept for each resident blob.

use std::path::PathBuf;

// == Cache Entry ==
/// Metadata for one resident cached blob.
///
/// While an entry is indexed, a file exists at `path` whose length is `size`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Caller-supplied key, opaque to the cache
    pub key: String,
    /// Backing file, `join(cache_dir, key)`
    pub path: PathBuf,
    /// Byte length of the stored payload
    pub size: u64,
}

impl Entry {
    // == Constructor ==
    /// Creates entry metadata for a blob already written at `path`.
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            size,
        }
    }
}
