//! Error types for GaugeBench Core.

use thiserror::Error;

/// Errors raised while lowering a value to its canonical form.
///
/// Any of these aborts receipt construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    #[error("non-finite float has no canonical encoding")]
    NonFiniteFloat,

    #[error("byte strings are not supported in canonical form")]
    BytesNotSupported,

    #[error("tagged values are not supported in canonical form")]
    TagNotSupported,

    #[error("map keys must be text")]
    NonTextKey,

    #[error("duplicate map key: {0}")]
    DuplicateKey(String),

    #[error("unsupported value type")]
    Unsupported,

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Core errors that can occur during receipt operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("canonicalization error: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("duplicate claim name: {0}")]
    DuplicateClaim(String),

    #[error("claim name must not be empty")]
    EmptyClaimName,

    #[error("checkpoint {checkpoint} references unknown claim: {name}")]
    UnknownClaim { checkpoint: usize, name: String },

    #[error("checkpoint {0} must have at least one input and one output")]
    EmptyCheckpoint(usize),

    #[error("checkpoint {0} digests do not match its claims")]
    ChainInconsistent(usize),

    #[error("a receipt needs at least one checkpoint")]
    EmptyChain,

    #[error("run metadata must be a JSON object")]
    InvalidMetadata,

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid receipt id: {0}")]
    InvalidReceiptId(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed signature entry: {0}")]
    MalformedSignature(String),

    #[error("unsupported schema version: {0}")]
    UnsupportedSchema(String),

    #[error("malformed receipt: {0}")]
    MalformedReceipt(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
