//! # GaugeBench Store
//!
//! Run-directory storage for GaugeBench receipts.
//!
//! ## Overview
//!
//! A run directory holds the artifacts of one run next to its receipt:
//!
//! ```text
//! <run>/
//!   manifest.json
//!   provenance.json
//!   results.json
//!   receipt.json
//!   inputs/...        (wrapped runs only)
//! ```
//!
//! Access goes through the [`ArtifactStore`] trait so the orchestration layer
//! never touches paths directly. [`FsRunStore`] is the on-disk implementation,
//! [`MemoryStore`] the in-memory one used by tests.
//!
//! ## Key Types
//!
//! - [`ArtifactStore`] - Digest, read and write artifacts of one run
//! - [`ArtifactPath`] - A validated run-relative path, derived from a claim name
//! - [`FsRunStore`] - Filesystem implementation with atomic writes
//! - [`MemoryStore`] - In-memory implementation
//!
//! ## Design Notes
//!
//! - **One read per claim**: a digest opens the artifact once and streams it in
//!   fixed-size chunks, so memory stays bounded and each check sees one snapshot.
//! - **Atomic writes**: files are written to a temporary sibling and renamed.
//! - **Confinement**: claim names can only resolve to paths inside the run directory.

pub mod digest;
pub mod error;
pub mod fs;
pub mod keystore;
pub mod layout;
pub mod memory;
pub mod traits;

pub use digest::{digest_file, digest_reader, DIGEST_CHUNK_SIZE};
pub use error::{Result, StoreError};
pub use fs::{write_atomic, FsRunStore};
pub use keystore::{generate_key_file, load_key_file, resolve_signing, write_key_file};
pub use layout::{ArtifactPath, INPUTS_DIR, MANIFEST_FILE, PROVENANCE_FILE, RECEIPT_FILE, RESULTS_FILE};
pub use memory::MemoryStore;
pub use traits::ArtifactStore;
