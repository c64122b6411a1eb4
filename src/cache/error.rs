//! Error types for the local response cache.

use thiserror::Error;

/// Errors returned while reading or writing cached API responses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CacheError {
    /// No blob is stored under the requested key.
    #[error("no cached entry for {key}")]
    NotFound {
        /// Rendered cache key.
        key: String,
    },

    /// The key identifier cannot be used as a single path segment.
    #[error("invalid cache key identifier '{identifier}'")]
    InvalidKey {
        /// The rejected identifier.
        identifier: String,
    },

    /// The filesystem operation failed.
    #[error("cache I/O failed for {key}: {message}")]
    Io {
        /// Rendered cache key or directory.
        key: String,
        /// Error detail from the filesystem.
        message: String,
    },

    /// The stored blob is not valid JSON for the expected shape.
    #[error("cached entry {key} is malformed: {message}")]
    Malformed {
        /// Rendered cache key.
        key: String,
        /// Error detail from `serde_json`.
        message: String,
    },
}
