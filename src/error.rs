//! Error types for the disk cache
//!
//! Provides unified error handling using thiserror.

use std::io;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the disk cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache directory path is empty
    #[error("invalid directory: path must not be empty")]
    InvalidDirectory,

    /// Capacity is not a positive byte count
    #[error("invalid capacity: {0} bytes, cache size must be greater than zero")]
    InvalidCapacity(u64),

    /// A single payload is larger than the whole cache
    #[error("payload of {size} bytes exceeds cache capacity of {max_size} bytes")]
    TooLarge { size: u64, max_size: u64 },

    /// Key is not resident in the cache
    #[error("key not found: {0}")]
    NotFound(String),

    /// Underlying filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CacheError {
    /// Returns true if this error is a cache miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    /// Wraps an internal invariant failure as an I/O error.
    pub(crate) fn invariant(msg: impl Into<String>) -> Self {
        CacheError::Io(io::Error::new(io::ErrorKind::Other, msg.into()))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the disk cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::InvalidDirectory.to_string(),
            "invalid directory: path must not be empty"
        );
        assert_eq!(
            CacheError::TooLarge {
                size: 5,
                max_size: 4
            }
            .to_string(),
            "payload of 5 bytes exceeds cache capacity of 4 bytes"
        );
        assert_eq!(
            CacheError::NotFound("a".to_string()).to_string(),
            "key not found: a"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: CacheError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, CacheError::Io(ref e) if e.kind() == io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_invariant_is_io() {
        let err = CacheError::invariant("index empty");
        assert!(matches!(err, CacheError::Io(ref e) if e.kind() == io::ErrorKind::Other));
    }
}
