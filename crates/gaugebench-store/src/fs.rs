//! Filesystem implementation of the ArtifactStore trait.
//!
//! One `FsRunStore` is rooted at one run directory. Writes go to a temporary
//! file in the destination directory and are renamed into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gaugebench_core::{Receipt, Sha256Hash};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::digest::{digest_file, DIGEST_CHUNK_SIZE};
use crate::error::{Result, StoreError};
use crate::layout::ArtifactPath;
use crate::traits::ArtifactStore;

/// A run directory on disk.
#[derive(Debug, Clone)]
pub struct FsRunStore {
    root: PathBuf,
    chunk_size: usize,
}

impl FsRunStore {
    /// Open a run directory. The directory does not have to exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            chunk_size: DIGEST_CHUNK_SIZE,
        }
    }

    /// Override the streaming chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the run directory if needed.
    pub fn create(&self) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))
    }

    /// Absolute location of an artifact.
    pub fn path_of(&self, path: &ArtifactPath) -> PathBuf {
        path.to_path(&self.root)
    }
}

impl ArtifactStore for FsRunStore {
    fn digest_artifact(&self, path: &ArtifactPath) -> Result<Sha256Hash> {
        let digest = digest_file(&self.path_of(path), self.chunk_size)?;
        debug!(artifact = %path, digest = %digest, "digested artifact");
        Ok(digest)
    }

    fn write_artifact(&self, path: &ArtifactPath, contents: &[u8]) -> Result<()> {
        write_atomic(&self.path_of(path), contents)
    }

    fn read_receipt(&self) -> Result<Vec<u8>> {
        let full = self.path_of(&ArtifactPath::receipt());
        fs::read(&full).map_err(|e| StoreError::io(&full, e))
    }

    fn write_receipt(&self, receipt: &Receipt) -> Result<()> {
        let text = receipt.to_json_pretty()?;
        write_atomic(&self.path_of(&ArtifactPath::receipt()), text.as_bytes())?;
        debug!(id = %receipt.id, root = %self.root.display(), "wrote receipt");
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Write `contents` to `target` through a temporary sibling file.
pub fn write_atomic(target: &Path, contents: &[u8]) -> Result<()> {
    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|e| StoreError::io(&parent, e))?;

    let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| StoreError::io(&parent, e))?;
    tmp.write_all(contents).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(target)
        .map_err(|e| StoreError::io(target, e.error))?;
    Ok(())
}
