//! File storage behind the `/files` route.

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

/// Errors returned by a [`FileStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file exists under the requested name.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Any other I/O failure.
    #[error("I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Read/write access to named files.
///
/// Names are single path segments; implementations resolve them against
/// their own root.
pub trait FileStore: Send + Sync {
    /// Read the whole file.
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or truncate the file and write `data` into it.
    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError>;
}

/// A [`FileStore`] over a directory on disk.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Create a store rooted at `root`. The directory is not checked here.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory files are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl FileStore for DirectoryStore {
    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(name);
        debug!("Reading {path}", path = path.display());
        std::fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            // Reading a directory is treated as a missing file.
            _ if path.is_dir() => StoreError::NotFound(name.to_string()),
            _ => StoreError::Io {
                name: name.to_string(),
                source,
            },
        })
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(name);
        debug!("Writing {len} bytes to {path}", len = data.len(), path = path.display());
        std::fs::write(&path, data).map_err(|source| StoreError::Io {
            name: name.to_string(),
            source,
        })
    }
}
