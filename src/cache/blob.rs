//! Blob Store Module
//!
//! Filesystem helpers for the cache: payloads are staged into a temporary
//! file inside the cache directory, then renamed onto `join(dir, key)`.
//! Nothing here knows about eviction or the index.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;

/// Returns true if `dir` is usable as a cache directory path.
///
/// Syntactic only; the directory need not exist.
pub fn validate_dir(dir: &Path) -> bool {
    !dir.as_os_str().is_empty()
}

/// Strips trailing separators (`/tmp/cache//` becomes `/tmp/cache`).
pub fn normalize_dir(dir: &Path) -> PathBuf {
    dir.components().collect()
}

/// Location of the backing file for `key`, always under `dir`.
///
/// A leading separator or drive prefix is dropped, so `/a/b` maps to
/// `dir/a/b`. Otherwise keys are not sanitized: inner separators reach
/// into subdirectories and an empty key names `dir` itself, which makes
/// the write fail.
pub fn blob_path(dir: &Path, key: &str) -> PathBuf {
    let relative: PathBuf = Path::new(key)
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    dir.join(relative)
}

// == Staged Blob ==
/// A fully written payload not yet visible under its key.
///
/// Dropping it deletes the temporary file.
#[derive(Debug)]
pub struct StagedBlob {
    file: NamedTempFile,
    size: u64,
}

impl StagedBlob {
    /// Bytes written.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Renames the staged file onto `path`, replacing any existing file.
    pub fn persist(self, path: &Path) -> io::Result<()> {
        self.file.persist(path).map_err(|err| err.error)?;
        Ok(())
    }
}

/// Copies at most `limit` bytes of `reader` into a new temporary file in `dir`.
///
/// Creates `dir` on first use.
pub fn stage<R: Read>(dir: &Path, reader: R, limit: u64) -> io::Result<StagedBlob> {
    fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    let size = io::copy(&mut reader.take(limit), &mut file)?;
    file.flush()?;
    Ok(StagedBlob { file, size })
}

/// Deletes a backing file. Returns `Ok(false)` if it was already gone.
pub fn remove_blob(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}
