//! In-memory implementation of the ArtifactStore trait.
//!
//! This is primarily for testing. It has the same semantics as the run
//! directory but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use gaugebench_core::{Receipt, Sha256Hash};

use crate::error::{Result, StoreError};
use crate::layout::ArtifactPath;
use crate::traits::ArtifactStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Artifacts indexed by run-relative path.
    artifacts: BTreeMap<ArtifactPath, Bytes>,

    /// Persisted receipt JSON.
    receipt: Option<Bytes>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    /// Remove an artifact. Returns whether it existed.
    pub fn remove_artifact(&self, path: &ArtifactPath) -> bool {
        self.write().artifacts.remove(path).is_some()
    }

    /// Replace the receipt with arbitrary bytes.
    pub fn put_receipt_bytes(&self, bytes: impl Into<Bytes>) {
        self.write().receipt = Some(bytes.into());
    }

    /// Current content of an artifact.
    pub fn artifact(&self, path: &ArtifactPath) -> Option<Bytes> {
        self.read().artifacts.get(path).cloned()
    }

    /// Number of stored artifacts.
    pub fn artifact_count(&self) -> usize {
        self.read().artifacts.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryStoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryStoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactStore for MemoryStore {
    fn digest_artifact(&self, path: &ArtifactPath) -> Result<Sha256Hash> {
        self.read()
            .artifacts
            .get(path)
            .map(|bytes| Sha256Hash::hash(bytes))
            .ok_or_else(|| StoreError::NotFound(PathBuf::from(path.as_str())))
    }

    fn write_artifact(&self, path: &ArtifactPath, contents: &[u8]) -> Result<()> {
        self.write()
            .artifacts
            .insert(path.clone(), Bytes::copy_from_slice(contents));
        Ok(())
    }

    fn read_receipt(&self) -> Result<Vec<u8>> {
        self.read()
            .receipt
            .as_ref()
            .map(|b| b.to_vec())
            .ok_or_else(|| StoreError::NotFound(PathBuf::from(ArtifactPath::receipt().as_str())))
    }

    fn write_receipt(&self, receipt: &Receipt) -> Result<()> {
        let text = receipt.to_json_pretty()?;
        self.write().receipt = Some(Bytes::from(text.into_bytes()));
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaugebench_core::claim::{MANIFEST, RESULTS};
    use serde_json::json;

    #[test]
    fn test_write_digest_remove() {
        let store = MemoryStore::new();
        let path = ArtifactPath::for_claim(RESULTS).unwrap();

        let digest = store.write_json(&path, &json!({"depth": 42})).unwrap();
        assert_eq!(store.digest_artifact(&path).unwrap(), digest);
        assert_eq!(store.artifact_count(), 1);

        assert!(store.remove_artifact(&path));
        assert!(matches!(
            store.digest_artifact(&path),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_overwrite_changes_digest() {
        let store = MemoryStore::new();
        let path = ArtifactPath::for_claim(MANIFEST).unwrap();
        store.write_artifact(&path, b"a").unwrap();
        let before = store.digest_artifact(&path).unwrap();
        store.write_artifact(&path, b"b").unwrap();
        assert_ne!(store.digest_artifact(&path).unwrap(), before);
        assert_eq!(store.artifact(&path).unwrap().as_ref(), b"b");
    }

    #[test]
    fn test_receipt_absent_then_present() {
        let store = MemoryStore::new();
        assert!(matches!(store.read_receipt(), Err(StoreError::NotFound(_))));
        store.put_receipt_bytes(&b"{}"[..]);
        assert_eq!(store.read_receipt().unwrap(), b"{}");
    }
}
