//! Verification orchestrator.
//!
//! Re-derives every value in a persisted receipt from the artifacts on disk
//! and compares:
//!
//! 1. Load and structurally validate the receipt. Failure → `Error`.
//! 2. Re-digest every claimed artifact, once each.
//! 3. Re-derive every checkpoint from the re-digested claims.
//! 4. Re-derive the identifier from the canonical body.
//! 5. Check signatures over the re-derived canonical body.
//!
//! Steps 2-5 always run to completion; every discrepancy is reported.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use gaugebench_core::chain::{rederive_chain, Rederived};
use gaugebench_core::receipt::sign_message;
use gaugebench_core::{validate_structure, CarId, Receipt, Sha256Hash, SignatureEntry};
use gaugebench_store::{ArtifactPath, ArtifactStore, FsRunStore, StoreError};
use tracing::{debug, info, warn};

use crate::config::VerifyConfig;

/// Terminal state of a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every check passed.
    Verified,
    /// At least one mismatch was found.
    Tampered,
    /// No mismatch, but a real signature could not be checked.
    Unverifiable,
    /// The receipt could not be loaded or is malformed.
    Error,
}

impl Outcome {
    /// Process exit code for the CLI.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Verified => 0,
            Self::Tampered => 1,
            Self::Error => 2,
            Self::Unverifiable => 3,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verified => "VERIFIED",
            Self::Tampered => "TAMPERED",
            Self::Unverifiable => "UNVERIFIABLE",
            Self::Error => "ERROR",
        })
    }
}

/// Which side of a checkpoint disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainSide {
    Inputs,
    Outputs,
}

impl fmt::Display for ChainSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inputs => "inputs_sha256",
            Self::Outputs => "outputs_sha256",
        })
    }
}

/// A discrepancy between the receipt and the run directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// An artifact's bytes no longer match its claim.
    Claim {
        name: String,
        expected: Sha256Hash,
        actual: Sha256Hash,
    },
    /// A claimed artifact could not be read.
    ArtifactUnreadable { name: String, reason: String },
    /// A stored checkpoint digest does not re-derive.
    Chain {
        index: usize,
        side: ChainSide,
        expected: Sha256Hash,
        actual: Sha256Hash,
    },
    /// The stored identifier is not the digest of the body.
    Id { expected: CarId, actual: CarId },
    /// A signature is present but does not verify, or signature fields are inconsistent.
    SignatureInvalid { reason: String },
    /// The receipt is unsigned and a signature was required.
    SignatureMissing,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Claim {
                name,
                expected,
                actual,
            } => write!(f, "claim '{name}': expected {expected}, actual {actual}"),
            Self::ArtifactUnreadable { name, reason } => {
                write!(f, "claim '{name}': artifact unreadable: {reason}")
            }
            Self::Chain {
                index,
                side,
                expected,
                actual,
            } => write!(
                f,
                "checkpoint {index} {side}: expected {expected}, actual {actual}"
            ),
            Self::Id { expected, actual } => {
                write!(f, "receipt id: expected {expected}, actual {actual}")
            }
            Self::SignatureInvalid { reason } => write!(f, "signature invalid: {reason}"),
            Self::SignatureMissing => f.write_str("signature missing: receipt is unsigned"),
        }
    }
}

/// A condition that prevents a verdict without indicating tampering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caution {
    SignatureUnverifiable { reason: String },
}

impl fmt::Display for Caution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignatureUnverifiable { reason } => write!(f, "signature unverifiable: {reason}"),
        }
    }
}

/// Everything a verification found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub outcome: Outcome,
    /// Identifier as stored in the receipt, when it could be parsed.
    pub receipt_id: Option<CarId>,
    pub mismatches: Vec<Mismatch>,
    pub cautions: Vec<Caution>,
    /// Diagnostic for the `Error` outcome.
    pub error: Option<String>,
}

impl VerificationReport {
    fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Error,
            receipt_id: None,
            mismatches: Vec::new(),
            cautions: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_verified(&self) -> bool {
        self.outcome == Outcome::Verified
    }

    /// Names of claims whose artifacts changed.
    pub fn tampered_claims(&self) -> Vec<&str> {
        self.mismatches
            .iter()
            .filter_map(|m| match m {
                Mismatch::Claim { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Verify the run directory at `dir`.
pub fn verify_run(dir: &Path, config: &VerifyConfig) -> VerificationReport {
    let store = FsRunStore::new(dir).with_chunk_size(config.chunk_size);
    verify_store(&store, config)
}

/// Verify a run held by any artifact store.
pub fn verify_store<S: ArtifactStore>(store: &S, config: &VerifyConfig) -> VerificationReport {
    let report = run_checks(store, config);
    match report.outcome {
        Outcome::Error => warn!(
            location = %store.location(),
            error = report.error.as_deref().unwrap_or_default(),
            "verification error"
        ),
        outcome => info!(
            location = %store.location(),
            outcome = %outcome,
            mismatches = report.mismatches.len(),
            "verification finished"
        ),
    }
    report
}

fn run_checks<S: ArtifactStore>(store: &S, config: &VerifyConfig) -> VerificationReport {
    // 1. Load
    let bytes = match store.read_receipt() {
        Ok(bytes) => bytes,
        Err(StoreError::NotFound(path)) => {
            return VerificationReport::error(format!("receipt not found: {}", path.display()))
        }
        Err(err) => return VerificationReport::error(err.to_string()),
    };
    let receipt = match Receipt::from_json(&bytes) {
        Ok(receipt) => receipt,
        Err(err) => return VerificationReport::error(err.to_string()),
    };
    if let Err(err) = validate_structure(&receipt) {
        return VerificationReport::error(err.to_string());
    }
    let mut paths = Vec::with_capacity(receipt.body.claims.len());
    for claim in &receipt.body.claims {
        match ArtifactPath::for_claim(&claim.name) {
            Ok(path) => paths.push(path),
            Err(err) => return VerificationReport::error(format!("malformed receipt: {err}")),
        }
    }

    let mut mismatches = Vec::new();
    let mut cautions = Vec::new();

    // 2. Claims
    let mut actual: HashMap<&str, Sha256Hash> = HashMap::with_capacity(paths.len());
    for (claim, path) in receipt.body.claims.iter().zip(&paths) {
        match store.digest_artifact(path) {
            Ok(digest) => {
                if digest != claim.sha256 {
                    debug!(claim = %claim.name, expected = %claim.sha256, actual = %digest, "claim mismatch");
                    mismatches.push(Mismatch::Claim {
                        name: claim.name.clone(),
                        expected: claim.sha256,
                        actual: digest,
                    });
                }
                actual.insert(claim.name.as_str(), digest);
            }
            Err(err) => mismatches.push(Mismatch::ArtifactUnreadable {
                name: claim.name.clone(),
                reason: err.to_string(),
            }),
        }
    }

    // 3. Chain
    match rederive_chain(&receipt.body.checkpoints, |name| actual.get(name).copied()) {
        Ok(rederived) => {
            for (index, (stored, derived)) in
                receipt.body.checkpoints.iter().zip(rederived).enumerate()
            {
                match derived {
                    Rederived::Digests {
                        inputs_sha256,
                        outputs_sha256,
                    } => {
                        for (side, expected, actual) in [
                            (ChainSide::Inputs, stored.inputs_sha256, inputs_sha256),
                            (ChainSide::Outputs, stored.outputs_sha256, outputs_sha256),
                        ] {
                            if expected != actual {
                                mismatches.push(Mismatch::Chain {
                                    index,
                                    side,
                                    expected,
                                    actual,
                                });
                            }
                        }
                    }
                    Rederived::Missing(name) => {
                        warn!(checkpoint = index, claim = %name, "skipping checkpoint, artifact unreadable");
                    }
                }
            }
        }
        Err(err) => return VerificationReport::error(err.to_string()),
    }

    // 4. Identifier
    let canonical = match receipt.body.canonical_bytes() {
        Ok(bytes) => bytes,
        Err(err) => return VerificationReport::error(err.to_string()),
    };
    let derived_id = CarId::from_digest(Sha256Hash::hash(&canonical));
    if derived_id != receipt.id {
        mismatches.push(Mismatch::Id {
            expected: receipt.id,
            actual: derived_id,
        });
    }

    // 5. Signatures
    check_signatures(&receipt, &canonical, config, &mut mismatches, &mut cautions);

    let outcome = if !mismatches.is_empty() {
        Outcome::Tampered
    } else if !cautions.is_empty() {
        Outcome::Unverifiable
    } else {
        Outcome::Verified
    };

    VerificationReport {
        outcome,
        receipt_id: Some(receipt.id),
        mismatches,
        cautions,
        error: None,
    }
}

fn check_signatures(
    receipt: &Receipt,
    canonical: &[u8],
    config: &VerifyConfig,
    mismatches: &mut Vec<Mismatch>,
    cautions: &mut Vec<Caution>,
) {
    let public_key = receipt.body.signer_public_key.as_ref();

    if receipt.is_unsigned() {
        if public_key.is_some() {
            mismatches.push(Mismatch::SignatureInvalid {
                reason: "signer public key present but receipt carries no signature".into(),
            });
        } else if config.require_signature {
            mismatches.push(Mismatch::SignatureMissing);
        }
        return;
    }

    let Some(public_key) = public_key else {
        mismatches.push(Mismatch::SignatureInvalid {
            reason: "signature present without signer public key".into(),
        });
        return;
    };

    let mut signatures = Vec::with_capacity(receipt.signatures.len());
    for entry in receipt.signature_entries() {
        match entry {
            Ok(SignatureEntry::Ed25519(sig)) => signatures.push(sig),
            Ok(SignatureEntry::Unsigned) => {}
            Err(err) => mismatches.push(Mismatch::SignatureInvalid {
                reason: err.to_string(),
            }),
        }
    }

    let Some(backend) = config.backend.as_ref() else {
        cautions.push(Caution::SignatureUnverifiable {
            reason: "no signature backend configured".into(),
        });
        return;
    };

    let message = sign_message(canonical);
    for (index, sig) in signatures.iter().enumerate() {
        if let Err(err) = backend.verify(public_key, &message, sig) {
            mismatches.push(Mismatch::SignatureInvalid {
                reason: format!("signature {index}: {err}"),
            });
        }
    }
}
