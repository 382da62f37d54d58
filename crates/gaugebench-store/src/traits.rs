//! Store trait: the abstract interface over one run's artifacts.
//!
//! The verification orchestrator and the producers only see this trait.
//! Implementations include the filesystem run directory (primary) and
//! in-memory (for tests).

use gaugebench_core::{Receipt, Sha256Hash};
use serde::Serialize;

use crate::error::{Result, StoreError};
use crate::layout::ArtifactPath;

/// The ArtifactStore trait: read, digest and write the artifacts of one run.
///
/// # Design Notes
///
/// - **Single read**: `digest_artifact` reads an artifact exactly once and never
///   buffers it whole. Callers reuse the digest instead of reading again.
/// - **Atomic writes**: `write_artifact` and `write_receipt` never leave a
///   partially written file behind.
/// - **Receipt isolation**: the receipt is not an artifact and cannot be
///   addressed through an [`ArtifactPath`] derived from a claim.
pub trait ArtifactStore {
    // ─────────────────────────────────────────────────────────────────────────
    // Artifacts
    // ─────────────────────────────────────────────────────────────────────────

    /// SHA-256 of the artifact's exact bytes.
    fn digest_artifact(&self, path: &ArtifactPath) -> Result<Sha256Hash>;

    /// Write an artifact, replacing any previous content.
    fn write_artifact(&self, path: &ArtifactPath, contents: &[u8]) -> Result<()>;

    /// Serialize `value` as pretty JSON and write it as an artifact.
    ///
    /// Returns the digest of the bytes written.
    fn write_json<T: Serialize + ?Sized>(&self, path: &ArtifactPath, value: &T) -> Result<Sha256Hash>
    where
        Self: Sized,
    {
        let mut bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        bytes.push(b'\n');
        self.write_artifact(path, &bytes)?;
        Ok(Sha256Hash::hash(&bytes))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Receipt
    // ─────────────────────────────────────────────────────────────────────────

    /// Raw bytes of the persisted receipt.
    fn read_receipt(&self) -> Result<Vec<u8>>;

    /// Persist a receipt.
    fn write_receipt(&self, receipt: &Receipt) -> Result<()>;

    /// Human-readable location, used in logs.
    fn location(&self) -> String;
}
