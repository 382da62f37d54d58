//! Hash chain: checkpoints binding an inputs digest to an outputs digest.
//!
//! ```text
//! checkpoint 0:  inputs_sha256 = H(canon([input claims...]))
//!                outputs_sha256 = H(canon([output claims...]))
//! checkpoint n:  inputs_sha256 = H(canon([checkpoint:<n-1> link, input claims...]))
//!                outputs_sha256 = H(canon([output claims...]))
//! ```
//!
//! The link claim carries checkpoint n-1's `outputs_sha256`, so editing any
//! stored checkpoint invalidates every later one.

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_digest;
use crate::claim::{Claim, ClaimSet};
use crate::crypto::Sha256Hash;
use crate::error::{CanonicalError, CoreError, Result};

/// The only checkpoint mode: a process step proof.
pub const CHECKPOINT_MODE: &str = "process";

/// Prefix of the synthetic claim that links a checkpoint to its predecessor.
pub const LINK_PREFIX: &str = "checkpoint:";

/// One step of the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Claim names on the inputs side, in order.
    pub inputs: Vec<String>,
    /// Claim names on the outputs side, in order.
    pub outputs: Vec<String>,
    pub inputs_sha256: Sha256Hash,
    pub outputs_sha256: Sha256Hash,
    pub mode: String,
}

/// The link claim placed first on the inputs side of checkpoint `index`.
pub fn link_claim(index: usize, prev_outputs: Sha256Hash) -> Claim {
    Claim::new(format!("{}{}", LINK_PREFIX, index - 1), prev_outputs)
}

/// Digest of a checkpoint's inputs side.
pub fn inputs_digest(
    index: usize,
    prev_outputs: Option<Sha256Hash>,
    inputs: &[Claim],
) -> std::result::Result<Sha256Hash, CanonicalError> {
    match prev_outputs {
        Some(prev) if index > 0 => {
            let mut linked = Vec::with_capacity(inputs.len() + 1);
            linked.push(link_claim(index, prev));
            linked.extend_from_slice(inputs);
            canonical_digest(&linked)
        }
        _ => canonical_digest(inputs),
    }
}

/// Digest of a checkpoint's outputs side.
pub fn outputs_digest(outputs: &[Claim]) -> std::result::Result<Sha256Hash, CanonicalError> {
    canonical_digest(outputs)
}

/// Builds a chain of checkpoints over a claim set.
pub struct ChainBuilder<'a> {
    claims: &'a ClaimSet,
    checkpoints: Vec<Checkpoint>,
}

impl<'a> ChainBuilder<'a> {
    /// Start a chain over the given claims.
    pub fn new(claims: &'a ClaimSet) -> Self {
        Self {
            claims,
            checkpoints: Vec::new(),
        }
    }

    /// Append a step. Every name must be present in the claim set.
    ///
    /// Adding a step never changes the checkpoints already built.
    pub fn step<I, O>(mut self, inputs: &[I], outputs: &[O]) -> Result<Self>
    where
        I: AsRef<str>,
        O: AsRef<str>,
    {
        let index = self.checkpoints.len();
        if inputs.is_empty() || outputs.is_empty() {
            return Err(CoreError::EmptyCheckpoint(index));
        }

        let input_claims = self.resolve(index, inputs)?;
        let output_claims = self.resolve(index, outputs)?;
        let prev = self.checkpoints.last().map(|c| c.outputs_sha256);

        let checkpoint = Checkpoint {
            inputs: inputs.iter().map(|n| n.as_ref().to_string()).collect(),
            outputs: outputs.iter().map(|n| n.as_ref().to_string()).collect(),
            inputs_sha256: inputs_digest(index, prev, &input_claims)?,
            outputs_sha256: outputs_digest(&output_claims)?,
            mode: CHECKPOINT_MODE.to_string(),
        };
        self.checkpoints.push(checkpoint);
        Ok(self)
    }

    /// Finish the chain. At least one step is required.
    pub fn finish(self) -> Result<Vec<Checkpoint>> {
        if self.checkpoints.is_empty() {
            return Err(CoreError::EmptyChain);
        }
        Ok(self.checkpoints)
    }

    fn resolve<S: AsRef<str>>(&self, index: usize, names: &[S]) -> Result<Vec<Claim>> {
        names
            .iter()
            .map(|name| {
                self.claims
                    .get(name.as_ref())
                    .cloned()
                    .ok_or_else(|| CoreError::UnknownClaim {
                        checkpoint: index,
                        name: name.as_ref().to_string(),
                    })
            })
            .collect()
    }
}

/// Result of re-deriving one stored checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rederived {
    /// Both sides were recomputed.
    Digests {
        inputs_sha256: Sha256Hash,
        outputs_sha256: Sha256Hash,
    },
    /// A referenced claim had no digest available.
    Missing(String),
}

/// Recompute every stored checkpoint from claim digests supplied by `lookup`.
///
/// Checkpoint n links to the *stored* outputs digest of checkpoint n-1, so a
/// forged earlier checkpoint surfaces at every later step too.
pub fn rederive_chain<F>(
    checkpoints: &[Checkpoint],
    mut lookup: F,
) -> std::result::Result<Vec<Rederived>, CanonicalError>
where
    F: FnMut(&str) -> Option<Sha256Hash>,
{
    let mut out = Vec::with_capacity(checkpoints.len());
    for (index, checkpoint) in checkpoints.iter().enumerate() {
        let mut gather = |names: &[String]| -> std::result::Result<Vec<Claim>, String> {
            names
                .iter()
                .map(|n| lookup(n).map(|d| Claim::new(n.clone(), d)).ok_or_else(|| n.clone()))
                .collect()
        };

        let inputs = match gather(&checkpoint.inputs) {
            Ok(claims) => claims,
            Err(name) => {
                out.push(Rederived::Missing(name));
                continue;
            }
        };
        let outputs = match gather(&checkpoint.outputs) {
            Ok(claims) => claims,
            Err(name) => {
                out.push(Rederived::Missing(name));
                continue;
            }
        };

        let prev = index
            .checked_sub(1)
            .map(|i| checkpoints[i].outputs_sha256);
        out.push(Rederived::Digests {
            inputs_sha256: inputs_digest(index, prev, &inputs)?,
            outputs_sha256: outputs_digest(&outputs)?,
        });
    }
    Ok(out)
}
