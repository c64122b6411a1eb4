//! Filesystem cache backend rooted at a per-repository directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use super::{BlobCache, CacheError, CacheKey};

/// Stores each blob as a file beneath a repository cache root.
///
/// All access goes through a capability handle on the root, so keys can only
/// ever resolve to files inside it.
#[derive(Debug)]
pub struct DiskCache {
    root: Utf8PathBuf,
    dir: Dir,
}

impl DiskCache {
    /// Opens the cache rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Io`] when the directory cannot be created or
    /// opened.
    pub fn open(root: &Utf8Path) -> Result<Self, CacheError> {
        Dir::create_ambient_dir_all(root, ambient_authority())
            .map_err(|error| dir_error(root, &error, "create"))?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|error| dir_error(root, &error, "open"))?;
        Ok(Self {
            root: root.to_path_buf(),
            dir,
        })
    }

    /// Root directory of the cache.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Absolute or root-relative location of the blob for `key`.
    #[must_use]
    pub fn path_for(&self, key: &CacheKey) -> Utf8PathBuf {
        self.root.join(key.relative_path())
    }
}

impl BlobCache for DiskCache {
    fn exists(&self, key: &CacheKey) -> Result<bool, CacheError> {
        match self.dir.metadata(key.relative_path()) {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(io_error(key, &error)),
        }
    }

    fn read(&self, key: &CacheKey) -> Result<Vec<u8>, CacheError> {
        self.dir.read(key.relative_path()).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                CacheError::NotFound {
                    key: key.to_string(),
                }
            } else {
                io_error(key, &error)
            }
        })
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<(), CacheError> {
        let relative = key.relative_path();
        if let Some(parent) = relative.parent()
            && !parent.as_str().is_empty()
        {
            self.dir
                .create_dir_all(parent)
                .map_err(|error| io_error(key, &error))?;
        }
        let partial = partial_path(&relative);
        tracing::debug!("writing {} bytes to {}", bytes.len(), self.path_for(key));
        self.dir
            .write(&partial, bytes)
            .map_err(|error| io_error(key, &error))?;
        self.dir
            .rename(&partial, &self.dir, &relative)
            .map_err(|error| io_error(key, &error))
    }
}

/// Hidden sibling a blob is staged in before it is renamed into place.
/// Key identifiers never start with a dot, so it cannot shadow a key.
fn partial_path(relative: &Utf8Path) -> Utf8PathBuf {
    let file_name = relative.file_name().unwrap_or_default();
    relative.with_file_name(format!(".{file_name}.partial"))
}

fn io_error(key: &CacheKey, error: &io::Error) -> CacheError {
    CacheError::Io {
        key: key.to_string(),
        message: error.to_string(),
    }
}

fn dir_error(root: &Utf8Path, error: &io::Error, action: &str) -> CacheError {
    CacheError::Io {
        key: root.to_string(),
        message: format!("failed to {action} cache directory: {error}"),
    }
}
