//! In-memory cache backend.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{BlobCache, CacheError, CacheKey};

/// Keeps blobs in a map; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<BTreeMap<CacheKey, Vec<u8>>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored keys in key order.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] when the entry lock is poisoned.
    pub fn keys(&self) -> Result<Vec<CacheKey>, CacheError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<CacheKey, Vec<u8>>>, CacheError> {
        self.entries.lock().map_err(|error| CacheError::Io {
            key: "memory".to_owned(),
            message: error.to_string(),
        })
    }
}

impl BlobCache for MemoryCache {
    fn exists(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn read(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::NotFound {
                key: key.to_string(),
            })
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        self.lock()?.insert(key.clone(), bytes.to_vec());
        Ok(())
    }
}
