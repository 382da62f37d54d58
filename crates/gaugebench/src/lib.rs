//! # GaugeBench
//!
//! The unified API for GaugeBench: content-addressable receipts (CARs) for
//! benchmark runs.
//!
//! ## Overview
//!
//! A run directory holds a run's artifacts and a `receipt.json` that binds
//! them together:
//!
//! - **Claims**: the SHA-256 of every artifact, by name
//! - **Checkpoints**: a hash chain from the inputs side to the outputs side
//! - **Identifier**: `car:` + SHA-256 of the canonical receipt body
//! - **Signature**: optional Ed25519 signature over the canonical body
//!
//! Anyone holding the directory can re-derive all of these offline.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use gaugebench::{produce_run, verify_run, Engine, Outcome, ProduceConfig, VerifyConfig};
//!
//! fn example() -> gaugebench::Result<()> {
//!     let out = Path::new("runs/qic-001");
//!     produce_run(out, &Engine::qic("ibm_brisbane", 1024), &ProduceConfig::default())?;
//!
//!     let report = verify_run(out, &VerifyConfig::default());
//!     assert_eq!(report.outcome, Outcome::Verified);
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `gaugebench::core` - Canonicalization, digests, chain, receipts, signing
//! - `gaugebench::store` - Run-directory storage and key files

pub mod config;
pub mod engines;
pub mod error;
pub mod produce;
pub mod provenance;
pub mod verify;
pub mod wrap;

// Re-export component crates
pub use gaugebench_core as core;
pub use gaugebench_store as store;

// Re-export main types for convenience
pub use config::{ProduceConfig, VerifyConfig};
pub use engines::Engine;
pub use error::{Error, Result};
pub use produce::{produce_run, seal_run, RunLayout, RunOutput};
pub use provenance::Provenance;
pub use verify::{verify_run, verify_store, Caution, ChainSide, Mismatch, Outcome, VerificationReport};
pub use wrap::{wrap_folder, WrapRequest};

// Re-export commonly used core types
pub use gaugebench_core::{
    produce_receipt, CarId, Claim, ClaimSet, Ed25519PublicKey, Keypair, Receipt, ReceiptBuilder,
    Sha256Hash, SigningCapability,
};
