//! Structural checks on receipts, independent of any artifacts.

use std::collections::HashSet;

use crate::chain::CHECKPOINT_MODE;
use crate::error::{CoreError, Result};
use crate::receipt::{Receipt, ReceiptBody, SCHEMA_VERSION, UNSIGNED_PLACEHOLDER};

/// Validate a receipt's structure.
///
/// This performs:
/// - Schema version check
/// - Claim names non-empty and unique
/// - At least one checkpoint, each with non-empty sides naming known claims
/// - Run metadata is an object
/// - A non-empty signature list, with the placeholder only ever alone
///
/// It does not check digests, the identifier, or signatures.
pub fn validate_structure(receipt: &Receipt) -> Result<()> {
    validate_body(&receipt.body)?;

    if receipt.signatures.is_empty() {
        return Err(CoreError::MalformedReceipt(
            "signatures must not be empty".into(),
        ));
    }
    if receipt.signatures.len() > 1
        && receipt.signatures.iter().any(|s| s == UNSIGNED_PLACEHOLDER)
    {
        return Err(CoreError::MalformedReceipt(
            "unsigned placeholder mixed with signatures".into(),
        ));
    }
    Ok(())
}

/// Validate the parts of a receipt that are covered by its identifier.
pub fn validate_body(body: &ReceiptBody) -> Result<()> {
    if body.schema_version != SCHEMA_VERSION {
        return Err(CoreError::UnsupportedSchema(body.schema_version.clone()));
    }

    let mut seen = HashSet::with_capacity(body.claims.len());
    for claim in &body.claims {
        if claim.name.is_empty() {
            return Err(CoreError::EmptyClaimName);
        }
        if !seen.insert(claim.name.as_str()) {
            return Err(CoreError::DuplicateClaim(claim.name.clone()));
        }
    }

    if body.checkpoints.is_empty() {
        return Err(CoreError::EmptyChain);
    }
    for (index, checkpoint) in body.checkpoints.iter().enumerate() {
        if checkpoint.inputs.is_empty() || checkpoint.outputs.is_empty() {
            return Err(CoreError::EmptyCheckpoint(index));
        }
        if checkpoint.mode != CHECKPOINT_MODE {
            return Err(CoreError::MalformedReceipt(format!(
                "checkpoint {index} has unsupported mode '{}'",
                checkpoint.mode
            )));
        }
        for name in checkpoint.inputs.iter().chain(&checkpoint.outputs) {
            if !seen.contains(name.as_str()) {
                return Err(CoreError::UnknownClaim {
                    checkpoint: index,
                    name: name.clone(),
                });
            }
        }
    }

    if !body.run_metadata.is_object() {
        return Err(CoreError::InvalidMetadata);
    }
    Ok(())
}
