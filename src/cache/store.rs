//! Cache Store Module
//!
//! Disk cache engine combining the blob store with LRU tracking under a
//! size budget.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{blob, CacheStats, Entry, LruIndex};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache State ==
/// Everything guarded by the cache lock.
#[derive(Debug, Default)]
struct CacheState {
    index: LruIndex,
    stats: CacheStats,
}

impl CacheState {
    // == Evict Oldest ==
    /// Deletes the least recently used blob and drops it from the index.
    ///
    /// Returns `Ok(None)` if the index is empty. If the file cannot be
    /// deleted the entry stays indexed and keeps counting against capacity.
    fn evict_oldest(&mut self) -> Result<Option<Entry>> {
        let Some(victim) = self.index.peek_oldest() else {
            return Ok(None);
        };

        if !blob::remove_blob(&victim.path)? {
            warn!(key = %victim.key, path = %victim.path.display(), "Evicted entry had no backing file");
        }

        let evicted = self.index.pop_oldest();
        if let Some(entry) = &evicted {
            self.stats.record_eviction();
            debug!(
                key = %entry.key,
                size = entry.size,
                size_used = self.index.total_size(),
                "Evicted least recently used entry"
            );
        }
        Ok(evicted)
    }
}

// == Disk Cache ==
/// Size-bounded blob cache storing one file per key under a directory.
///
/// All operations that touch recency order, including `get`, take the
/// exclusive lock. `keys`, `stats` and the accessors only take the shared one.
#[derive(Debug)]
pub struct DiskCache {
    /// Directory holding the backing files
    dir: PathBuf,
    /// Capacity in bytes, fixed at construction
    max_size: u64,
    state: RwLock<CacheState>,
}

impl DiskCache {
    // == Constructor ==
    /// Creates an empty cache over `dir` holding at most `max_size` bytes.
    ///
    /// The directory is not touched until the first `put`.
    ///
    /// # Errors
    /// * `InvalidDirectory` - `dir` is empty
    /// * `InvalidCapacity` - `max_size` is zero
    pub fn new(dir: impl AsRef<Path>, max_size: u64) -> Result<Self> {
        let dir = dir.as_ref();
        if !blob::validate_dir(dir) {
            return Err(CacheError::InvalidDirectory);
        }
        if max_size == 0 {
            return Err(CacheError::InvalidCapacity(max_size));
        }

        let dir = blob::normalize_dir(dir);
        info!(dir = %dir.display(), max_size, "Disk cache initialized");

        Ok(Self {
            dir,
            max_size,
            state: RwLock::new(CacheState::default()),
        })
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.cache_dir, config.max_size)
    }

    // == Get ==
    /// Opens the blob stored under `key` and marks it most recently used.
    ///
    /// The returned file stays readable even if the entry is evicted later,
    /// on platforms where open handles survive deletion.
    ///
    /// # Errors
    /// * `NotFound` - key is not resident
    /// * `Io` - the indexed file could not be opened; recency is unchanged
    ///   and the lookup counts as a miss
    pub fn get(&self, key: &str) -> Result<File> {
        let mut state = self.state.write();

        let Some(path) = state.index.get(key).map(|entry| entry.path.clone()) else {
            state.stats.record_miss();
            debug!(key, "Cache miss");
            return Err(CacheError::NotFound(key.to_string()));
        };

        // Recency only changes once the blob is actually readable
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) => {
                state.stats.record_miss();
                warn!(key, path = %path.display(), error = %err, "Indexed blob could not be opened");
                return Err(CacheError::Io(err));
            }
        };
        state.index.touch(key);
        state.stats.record_hit();
        debug!(key, "Cache hit");
        Ok(file)
    }

    // == Put ==
    /// Stores `payload` under `key`, evicting least recently used entries
    /// until it fits.
    ///
    /// # Errors
    /// * `TooLarge` - payload exceeds the whole capacity; nothing changes
    /// * `Io` - staging, eviction or rename failed
    pub fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        let size = payload.len() as u64;
        if size > self.max_size {
            return Err(CacheError::TooLarge {
                size,
                max_size: self.max_size,
            });
        }
        self.put_reader(key, payload)
    }

    // == Put Reader ==
    /// Streaming form of [`put`](Self::put).
    ///
    /// The payload is staged in a temporary file first, so a failed read
    /// or write never evicts anything. At most `max_size + 1` bytes are read
    /// before the payload is rejected as too large.
    pub fn put_reader<R: Read>(&self, key: &str, reader: R) -> Result<()> {
        let mut state = self.state.write();

        let staged = blob::stage(&self.dir, reader, self.max_size.saturating_add(1))?;
        let size = staged.size();
        if size > self.max_size {
            return Err(CacheError::TooLarge {
                size,
                max_size: self.max_size,
            });
        }

        // An existing entry for `key` is about to be overwritten, so its
        // bytes count as free.
        loop {
            let reclaimable = state.index.get(key).map_or(0, |entry| entry.size);
            if state.index.total_size() - reclaimable + size <= self.max_size {
                break;
            }
            if state.evict_oldest()?.is_none() {
                return Err(CacheError::invariant(format!(
                    "index is empty but {} bytes still do not fit in {}",
                    size, self.max_size
                )));
            }
        }

        let path = blob::blob_path(&self.dir, key);
        staged.persist(&path)?;

        let replaced = state.index.push_front(Entry::new(key, path, size));
        debug!(
            key,
            size,
            replaced = replaced.is_some(),
            size_used = state.index.total_size(),
            "Stored blob"
        );
        Ok(())
    }

    // == Remove ==
    /// Deletes the blob stored under `key`.
    ///
    /// # Errors
    /// * `NotFound` - key is not resident
    /// * `Io` - the file could not be deleted; the entry stays indexed
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut state = self.state.write();

        let Some(path) = state.index.get(key).map(|entry| entry.path.clone()) else {
            return Err(CacheError::NotFound(key.to_string()));
        };

        if !blob::remove_blob(&path)? {
            warn!(key, path = %path.display(), "Removed entry had no backing file");
        }
        state.index.remove(key);
        debug!(key, "Removed blob");
        Ok(())
    }

    // == Keys ==
    /// Returns resident keys, most recently used first.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().index.keys()
    }

    /// Returns the entry for `key` without changing its recency.
    pub fn entry(&self, key: &str) -> Option<Entry> {
        self.state.read().index.get(key).cloned()
    }

    // == Contains ==
    /// Returns true if `key` is resident, without changing its recency.
    pub fn contains(&self, key: &str) -> bool {
        self.state.read().index.contains(key)
    }

    // == Length ==
    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.state.read().index.len()
    }

    // == Is Empty ==
    /// Returns true if no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.state.read().index.is_empty()
    }

    // == Size Used ==
    /// Bytes held by resident entries.
    pub fn size_used(&self) -> u64 {
        self.state.read().index.total_size()
    }

    // == Max Size ==
    /// Capacity in bytes, as given at construction.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    // == Directory ==
    /// Cache directory with trailing separators removed.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        let mut stats = state.stats.clone();
        stats.total_entries = state.index.len();
        stats.size_used = state.index.total_size();
        stats.max_size = self.max_size;
        stats
    }
}
