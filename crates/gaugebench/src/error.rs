//! Error types for the GaugeBench API.

use std::path::PathBuf;

use gaugebench_core::CoreError;
use gaugebench_store::StoreError;
use thiserror::Error;

/// Errors that can occur while producing a run.
///
/// Verification never returns these; it reports problems in a
/// [`VerificationReport`](crate::VerificationReport) instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Receipt construction failed.
    #[error("receipt error: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Wrap input and output directories overlap.
    #[error("input {} and output {} overlap", input.display(), output.display())]
    Overlap { input: PathBuf, output: PathBuf },

    /// Wrap input is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}

/// Result type for GaugeBench operations.
pub type Result<T> = std::result::Result<T, Error>;
