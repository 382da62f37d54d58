//! # GaugeBench Core
//!
//! Pure primitives for Content-Addressable Receipts (CARs): canonicalization,
//! SHA-256 digests, claims, hash-chained checkpoints, receipt construction and
//! signing.
//!
//! This crate contains no file I/O, no logging, no networking. It is pure
//! computation over the receipt data model. Reading artifacts from disk and
//! persisting receipts lives in `gaugebench-store`.
//!
//! ## Key Types
//!
//! - [`Claim`] / [`ClaimSet`] - Named artifact digests, ordered and unique
//! - [`Checkpoint`] / [`ChainBuilder`] - Hash-linked process steps
//! - [`ReceiptBody`] / [`Receipt`] - The CAR document and its `car:` identifier
//! - [`ReceiptBuilder`] - Assembles, identifies and optionally signs a receipt
//! - [`ReceiptSigner`] / [`SignatureBackend`] - Signing and verification capabilities
//!
//! ## Canonicalization
//!
//! Every hashed or signed structure is lowered to deterministic CBOR. See the
//! [`canonical`] module.

pub mod canonical;
pub mod chain;
pub mod claim;
pub mod crypto;
pub mod error;
pub mod receipt;
pub mod signer;
pub mod types;
pub mod validation;

pub use canonical::{canonical_bytes, canonical_digest};
pub use chain::{ChainBuilder, Checkpoint, Rederived, CHECKPOINT_MODE};
pub use claim::{Claim, ClaimSet};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash, Sha256Stream};
pub use error::{CanonicalError, CoreError, Result};
pub use receipt::{
    produce_receipt, Receipt, ReceiptBody, ReceiptBuilder, SCHEMA_VERSION, SIGN_DOMAIN,
    UNSIGNED_PLACEHOLDER,
};
pub use signer::{
    Ed25519Backend, ReceiptSigner, SignatureBackend, SignatureEntry, SigningCapability,
};
pub use types::CarId;
pub use validation::validate_structure;
