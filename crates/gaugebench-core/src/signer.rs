//! Signing and verification capabilities.
//!
//! Whether a signing key exists is decided once at the boundary and handed
//! to the builder as an [`Option<&dyn ReceiptSigner>`]. Verification likewise
//! receives an optional [`SignatureBackend`]; with no backend, a real
//! signature is reported as unverifiable rather than passed.

use crate::crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, ED25519_PREFIX};
use crate::error::{CoreError, Result};
use crate::receipt::UNSIGNED_PLACEHOLDER;

/// Something that can sign canonical receipt bodies.
pub trait ReceiptSigner {
    /// The public key embedded in the body as `signer_public_key`.
    fn public_key(&self) -> Ed25519PublicKey;

    /// Sign a message.
    fn sign(&self, message: &[u8]) -> Ed25519Signature;
}

impl ReceiptSigner for Keypair {
    fn public_key(&self) -> Ed25519PublicKey {
        Keypair::public_key(self)
    }

    fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Keypair::sign(self, message)
    }
}

/// Something that can check Ed25519 signatures.
pub trait SignatureBackend {
    fn verify(
        &self,
        public_key: &Ed25519PublicKey,
        message: &[u8],
        signature: &Ed25519Signature,
    ) -> Result<()>;
}

/// The built-in ed25519-dalek backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Backend;

impl SignatureBackend for Ed25519Backend {
    fn verify(
        &self,
        public_key: &Ed25519PublicKey,
        message: &[u8],
        signature: &Ed25519Signature,
    ) -> Result<()> {
        public_key.verify(message, signature)
    }
}

/// Signing capability resolved at the boundary.
#[derive(Debug, Clone)]
pub enum SigningCapability {
    Available(Keypair),
    /// No usable key. Receipts are produced with the unsigned placeholder.
    Unavailable { reason: String },
}

impl SigningCapability {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The signer, if one is available.
    pub fn signer(&self) -> Option<&dyn ReceiptSigner> {
        match self {
            Self::Available(keypair) => Some(keypair),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// A parsed entry of a receipt's `signatures` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureEntry {
    /// The explicit `unsigned:placeholder` marker.
    Unsigned,
    Ed25519(Ed25519Signature),
}

impl SignatureEntry {
    /// Parse an entry from its text form.
    pub fn parse(s: &str) -> Result<Self> {
        if s == UNSIGNED_PLACEHOLDER {
            return Ok(Self::Unsigned);
        }
        match s.strip_prefix(ED25519_PREFIX) {
            Some(payload) => Ok(Self::Ed25519(Ed25519Signature::from_base64(payload)?)),
            None => Err(CoreError::MalformedSignature(format!(
                "unknown signature scheme in '{}'",
                s.split(':').next().unwrap_or_default()
            ))),
        }
    }
}
