//! Configuration for producing and verifying runs.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use gaugebench_core::{Ed25519Backend, SignatureBackend, SigningCapability};
use gaugebench_store::DIGEST_CHUNK_SIZE;

/// Configuration for run production.
#[derive(Debug, Clone)]
pub struct ProduceConfig {
    /// Signing key, resolved once at the boundary.
    pub signing: SigningCapability,
    /// Streaming chunk size for artifact digests.
    pub chunk_size: usize,
    /// Fixed receipt timestamp (Unix ms). `None` uses the current time.
    pub timestamp: Option<i64>,
    /// Working root whose git HEAD is recorded in `provenance.json`.
    /// `None` uses the current directory.
    pub provenance_root: Option<PathBuf>,
}

impl Default for ProduceConfig {
    fn default() -> Self {
        Self {
            signing: SigningCapability::unavailable("no signing key configured"),
            chunk_size: DIGEST_CHUNK_SIZE,
            timestamp: None,
            provenance_root: None,
        }
    }
}

impl ProduceConfig {
    pub fn with_signing(mut self, signing: SigningCapability) -> Self {
        self.signing = signing;
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_provenance_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.provenance_root = Some(root.into());
        self
    }
}

/// Configuration for verification.
#[derive(Clone)]
pub struct VerifyConfig {
    /// Signature backend. `None` turns real signatures into a caution.
    pub backend: Option<Arc<dyn SignatureBackend + Send + Sync>>,
    /// Report unsigned receipts as tampered.
    pub require_signature: bool,
    /// Streaming chunk size for artifact digests.
    pub chunk_size: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            backend: Some(Arc::new(Ed25519Backend)),
            require_signature: false,
            chunk_size: DIGEST_CHUNK_SIZE,
        }
    }
}

impl VerifyConfig {
    /// Verification without any signature backend.
    pub fn without_backend() -> Self {
        Self {
            backend: None,
            ..Self::default()
        }
    }

    pub fn require_signature(mut self, require: bool) -> Self {
        self.require_signature = require;
        self
    }
}

impl fmt::Debug for VerifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifyConfig")
            .field("backend", &self.backend.as_ref().map(|_| "configured"))
            .field("require_signature", &self.require_signature)
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}
