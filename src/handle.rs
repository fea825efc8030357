//! Shared Cache Handle
//!
//! Async wrapper for tokio hosts. Filesystem work runs on the blocking pool.

use std::io;
use std::sync::Arc;

use tokio::task;

use crate::cache::{CacheStats, DiskCache};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Cloneable handle to a [`DiskCache`].
///
/// Every clone refers to the same cache, directory and lock.
#[derive(Debug, Clone)]
pub struct SharedCache {
    /// Shared disk cache
    pub cache: Arc<DiskCache>,
}

impl SharedCache {
    /// Creates a new handle around the given cache.
    pub fn new(cache: DiskCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new handle from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(DiskCache::from_config(config)?))
    }

    // == Put ==
    /// Stores `payload` under `key`, see [`DiskCache::put`].
    pub async fn put(&self, key: impl Into<String>, payload: Vec<u8>) -> Result<()> {
        let key = key.into();
        self.run(move |cache| cache.put(&key, &payload)).await
    }

    // == Get ==
    /// Opens the blob under `key` as an async file, see [`DiskCache::get`].
    pub async fn get(&self, key: impl Into<String>) -> Result<tokio::fs::File> {
        let key = key.into();
        let file = self.run(move |cache| cache.get(&key)).await?;
        Ok(tokio::fs::File::from_std(file))
    }

    // == Remove ==
    /// Deletes the blob stored under `key`, see [`DiskCache::remove`].
    pub async fn remove(&self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        self.run(move |cache| cache.remove(&key)).await
    }

    // == Keys ==
    /// Returns resident keys, most recently used first.
    pub async fn keys(&self) -> Result<Vec<String>> {
        self.run(|cache| Ok(cache.keys())).await
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> Result<CacheStats> {
        self.run(|cache| Ok(cache.stats())).await
    }

    /// Runs `f` against the cache on the blocking pool.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&DiskCache) -> Result<T> + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        task::spawn_blocking(move || f(cache.as_ref()))
            .await
            .map_err(|err| CacheError::Io(io::Error::new(io::ErrorKind::Other, err)))?
    }
}
