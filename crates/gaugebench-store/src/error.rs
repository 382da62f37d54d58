//! Error types for the store module.

use std::path::PathBuf;

use gaugebench_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Artifact or receipt does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other I/O failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refusing to overwrite an existing file.
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// A relative path that would escape the run directory or is empty.
    #[error("invalid artifact path: {0}")]
    InvalidPath(String),

    /// A claim name with no artifact path convention.
    #[error("no artifact convention for claim: {0}")]
    UnknownClaim(String),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Signing key file could not be used.
    #[error("signing key error: {0}")]
    Key(String),

    /// Receipt encoding error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Map an I/O error at `path`, keeping `NotFound` distinct.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            StoreError::NotFound(path)
        } else {
            StoreError::Io { path, source }
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
