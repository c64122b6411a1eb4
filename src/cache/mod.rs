//! Write-once local cache for raw GitHub API responses.
//!
//! Each [`CacheKey`] maps to at most one JSON blob. Presence of a blob means
//! the resource was already fetched; the cache itself never expires or
//! rewrites entries unless a caller writes the same key twice. Callers guard
//! writes with [`BlobCache::exists`].
//!
//! [`DiskCache`] stores blobs under a per-repository directory, and
//! [`MemoryCache`] keeps them in a map for tests and dry runs.

mod disk;
mod error;
mod key;
mod memory;

pub use disk::DiskCache;
pub use error::CacheError;
pub use key::{CacheKey, ResourceKind};
pub use memory::MemoryCache;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Storage backend for cached API responses.
pub trait BlobCache: Send + Sync {
    /// Returns true when a blob is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] when the backend cannot be inspected.
    fn exists(&self, key: &CacheKey) -> Result<bool, CacheError>;

    /// Reads the full blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] when nothing is stored under `key`
    /// and [`CacheError::Io`] when reading fails.
    fn read(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError>;

    /// Stores `bytes` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] when the blob cannot be written.
    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError>;

    /// Reads and deserialises the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns the [`BlobCache::read`] errors and [`CacheError::Malformed`]
    /// when the blob does not parse as `T`.
    fn read_json<T>(&self, key: &CacheKey) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        let bytes = self.read(key)?;
        serde_json::from_slice(&bytes).map_err(|error| CacheError::Malformed {
            key: key.to_string(),
            message: error.to_string(),
        })
    }

    /// Serialises `value` as pretty JSON (two-space indent) and stores it.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Malformed`] when serialisation fails and the
    /// [`BlobCache::write`] errors otherwise.
    fn write_json<T>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + ?Sized,
        Self: Sized,
    {
        let bytes = serde_json::to_vec_pretty(value).map_err(|error| CacheError::Malformed {
            key: key.to_string(),
            message: error.to_string(),
        })?;
        self.write(key, &bytes)
    }
}
