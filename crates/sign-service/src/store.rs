//! Artifact storage

use crate::{Result, ServiceError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Flat keyed blob store
///
/// Keys are relative `/`-separated paths such as `abc.pdf` or
/// `signed/abc_signed_1700000000000.pdf`.
pub trait ArtifactStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read a blob, `None` if the key is unknown
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Delete a blob; unknown keys are not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

fn validate_key(key: &str) -> Result<()> {
    let path = Path::new(key);
    let valid = !key.is_empty()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(ServiceError::Validation(format!("Invalid artifact key: {key}")))
    }
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryArtifactStore {
    blobs: BTreeMap<String, Vec<u8>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.blobs.get(key).cloned())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.blobs.contains_key(key))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.blobs.remove(key);
        Ok(())
    }
}

/// Store rooted at a directory
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    /// Use `root` as the store directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&mut self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, bytes)
            .map_err(|e| ServiceError::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ServiceError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.path_for(key)?.is_file())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ServiceError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
