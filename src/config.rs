//! Configuration Module
//!
//! Handles loading the cache directory and capacity from environment variables.

use std::env;
use std::path::PathBuf;

/// Default capacity: 1 GiB
pub const DEFAULT_MAX_SIZE: u64 = 1024 * 1024 * 1024;

/// Disk cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one file per resident key
    pub cache_dir: PathBuf,
    /// Total bytes of payload the cache may hold
    pub max_size: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DISKCACHE_DIR` - Cache directory (default: `<temp dir>/mini_diskcache`)
    /// - `DISKCACHE_MAX_SIZE` - Capacity in bytes (default: 1 GiB)
    pub fn from_env() -> Self {
        Self {
            cache_dir: env::var_os("DISKCACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_dir),
            max_size: env::var("DISKCACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_SIZE),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

fn default_cache_dir() -> PathBuf {
    env::temp_dir().join("mini_diskcache")
}
