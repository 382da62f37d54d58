//! Receipt: the content-addressable proof of a run.
//!
//! A receipt is a body (claims, checkpoints, metadata) plus its identifier
//! and signatures. The identifier is derived from the canonical body alone:
//!
//! `id = "car:" || hex(sha256(canonical(body)))`
//!
//! Signatures are computed over `SIGN_DOMAIN || canonical(body)` and attached
//! afterwards, so they never feed back into the identifier. When a signer is
//! present its public key is part of the body, which binds the identifier to
//! the signer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::canonical_bytes;
use crate::chain::{rederive_chain, Checkpoint, Rederived};
use crate::claim::{Claim, ClaimSet};
use crate::crypto::{Ed25519PublicKey, Sha256Hash};
use crate::error::{CanonicalError, CoreError, Result};
use crate::signer::{ReceiptSigner, SignatureEntry};
use crate::types::CarId;
use crate::validation::validate_body;

/// The receipt schema version written by this implementation.
pub const SCHEMA_VERSION: &str = "0.3";

/// Marker stored in `signatures` when no signing key was available.
pub const UNSIGNED_PLACEHOLDER: &str = "unsigned:placeholder";

/// Domain separation prefix for signing.
pub const SIGN_DOMAIN: &[u8] = b"gaugebench/car-sig/v1";

/// Everything covered by the receipt identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptBody {
    pub schema_version: String,
    pub claims: Vec<Claim>,
    pub checkpoints: Vec<Checkpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signer_public_key: Option<Ed25519PublicKey>,
    /// Unix milliseconds, fixed before canonicalization.
    pub timestamp: i64,
    pub run_metadata: Value,
}

impl ReceiptBody {
    /// Canonical bytes of the body.
    pub fn canonical_bytes(&self) -> std::result::Result<Vec<u8>, CanonicalError> {
        canonical_bytes(self)
    }

    /// Derive the content-addressable identifier.
    pub fn compute_id(&self) -> std::result::Result<CarId, CanonicalError> {
        let bytes = self.canonical_bytes()?;
        Ok(CarId::from_digest(Sha256Hash::hash(&bytes)))
    }

    /// The message a signer signs: `SIGN_DOMAIN || canonical(body)`.
    pub fn signed_message(&self) -> std::result::Result<Vec<u8>, CanonicalError> {
        Ok(sign_message(&self.canonical_bytes()?))
    }

    /// Look up a claim by name.
    pub fn claim(&self, name: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.name == name)
    }
}

/// Build the message to sign (with domain separation).
pub fn sign_message(canonical_body: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(SIGN_DOMAIN.len() + canonical_body.len());
    msg.extend_from_slice(SIGN_DOMAIN);
    msg.extend_from_slice(canonical_body);
    msg
}

/// A complete receipt: body + identifier + signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ReceiptDocument", into = "ReceiptDocument")]
pub struct Receipt {
    pub id: CarId,
    pub body: ReceiptBody,
    /// Never empty: either `unsigned:placeholder` or `ed25519:` entries.
    pub signatures: Vec<String>,
}

impl Receipt {
    /// True when the only signature is the unsigned placeholder.
    pub fn is_unsigned(&self) -> bool {
        self.signatures.len() == 1 && self.signatures[0] == UNSIGNED_PLACEHOLDER
    }

    /// Parse every signature entry.
    pub fn signature_entries(&self) -> Vec<Result<SignatureEntry>> {
        self.signatures.iter().map(|s| SignatureEntry::parse(s)).collect()
    }

    /// Parse a receipt from `receipt.json` bytes.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::MalformedReceipt(e.to_string()))
    }

    /// Pretty JSON with a trailing newline, as persisted on disk.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|e| CoreError::EncodingError(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }
}

/// On-disk field layout of `receipt.json`.
#[derive(Serialize, Deserialize)]
struct ReceiptDocument {
    schema_version: String,
    id: CarId,
    claims: Vec<Claim>,
    checkpoints: Vec<Checkpoint>,
    signatures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signer_public_key: Option<Ed25519PublicKey>,
    timestamp: i64,
    run_metadata: Value,
}

impl From<ReceiptDocument> for Receipt {
    fn from(doc: ReceiptDocument) -> Self {
        Self {
            id: doc.id,
            body: ReceiptBody {
                schema_version: doc.schema_version,
                claims: doc.claims,
                checkpoints: doc.checkpoints,
                signer_public_key: doc.signer_public_key,
                timestamp: doc.timestamp,
                run_metadata: doc.run_metadata,
            },
            signatures: doc.signatures,
        }
    }
}

impl From<Receipt> for ReceiptDocument {
    fn from(receipt: Receipt) -> Self {
        Self {
            schema_version: receipt.body.schema_version,
            id: receipt.id,
            claims: receipt.body.claims,
            checkpoints: receipt.body.checkpoints,
            signatures: receipt.signatures,
            signer_public_key: receipt.body.signer_public_key,
            timestamp: receipt.body.timestamp,
            run_metadata: receipt.body.run_metadata,
        }
    }
}

/// Builder for creating receipts.
pub struct ReceiptBuilder {
    schema_version: String,
    claims: ClaimSet,
    checkpoints: Vec<Checkpoint>,
    timestamp: i64,
    run_metadata: Value,
}

impl ReceiptBuilder {
    /// Start building a receipt over claims and their checkpoints.
    pub fn new(claims: ClaimSet, checkpoints: Vec<Checkpoint>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            claims,
            checkpoints,
            timestamp: 0,
            run_metadata: Value::Object(Default::default()),
        }
    }

    /// Set the timestamp (Unix milliseconds).
    pub fn timestamp(mut self, ts: i64) -> Self {
        self.timestamp = ts;
        self
    }

    /// Set the run metadata. Must be a JSON object.
    pub fn run_metadata(mut self, metadata: Value) -> Self {
        self.run_metadata = metadata;
        self
    }

    /// Override the schema version.
    pub fn schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    /// Assemble the body, derive its identifier, and sign if a signer is given.
    ///
    /// Fails without producing anything if the checkpoints do not match the
    /// claims or the body has no canonical form.
    pub fn build(self, signer: Option<&dyn ReceiptSigner>) -> Result<Receipt> {
        let body = ReceiptBody {
            schema_version: self.schema_version,
            claims: self.claims.into_vec(),
            checkpoints: self.checkpoints,
            signer_public_key: signer.map(|s| s.public_key()),
            timestamp: self.timestamp,
            run_metadata: self.run_metadata,
        };
        validate_body(&body)?;
        check_chain(&body)?;

        let canonical = body.canonical_bytes()?;
        let id = CarId::from_digest(Sha256Hash::hash(&canonical));

        let signatures = match signer {
            Some(signer) => vec![signer.sign(&sign_message(&canonical)).to_entry()],
            None => vec![UNSIGNED_PLACEHOLDER.to_string()],
        };

        Ok(Receipt {
            id,
            body,
            signatures,
        })
    }
}

/// Build a receipt in one call.
pub fn produce_receipt(
    claims: ClaimSet,
    checkpoints: Vec<Checkpoint>,
    run_metadata: Value,
    timestamp: i64,
    signer: Option<&dyn ReceiptSigner>,
) -> Result<Receipt> {
    ReceiptBuilder::new(claims, checkpoints)
        .timestamp(timestamp)
        .run_metadata(run_metadata)
        .build(signer)
}

/// Every checkpoint must re-derive from the body's own claims.
fn check_chain(body: &ReceiptBody) -> Result<()> {
    let rederived = rederive_chain(&body.checkpoints, |name| body.claim(name).map(|c| c.sha256))?;
    for (index, (stored, derived)) in body.checkpoints.iter().zip(rederived).enumerate() {
        match derived {
            Rederived::Digests {
                inputs_sha256,
                outputs_sha256,
            } => {
                if inputs_sha256 != stored.inputs_sha256 || outputs_sha256 != stored.outputs_sha256 {
                    return Err(CoreError::ChainInconsistent(index));
                }
            }
            Rederived::Missing(name) => {
                return Err(CoreError::UnknownClaim {
                    checkpoint: index,
                    name,
                })
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ChainBuilder;
    use crate::claim::{MANIFEST, RESULTS};
    use crate::crypto::Keypair;
    use serde_json::json;

    fn claims() -> ClaimSet {
        ClaimSet::from_claims(vec![
            Claim::from_bytes(MANIFEST, br#"{"shots": 1000}"#),
            Claim::from_bytes(RESULTS, br#"{"gate_error_rate": 0.002}"#),
        ])
        .unwrap()
    }

    fn builder() -> ReceiptBuilder {
        let claims = claims();
        let chain = ChainBuilder::new(&claims)
            .step(&[MANIFEST], &[RESULTS])
            .unwrap()
            .finish()
            .unwrap();
        ReceiptBuilder::new(claims, chain)
            .timestamp(1_736_870_400_000)
            .run_metadata(json!({"engine": "qic", "backend": "ibm_brisbane"}))
    }

    #[test]
    fn test_unsigned_receipt() {
        let receipt = builder().build(None).unwrap();
        assert_eq!(receipt.signatures, vec!["unsigned:placeholder"]);
        assert!(receipt.is_unsigned());
        assert!(receipt.body.signer_public_key.is_none());
        assert_eq!(receipt.body.schema_version, "0.3");

        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("signer_public_key").is_none());
        assert!(json["id"].as_str().unwrap().starts_with("car:"));
    }

    #[test]
    fn test_id_deterministic() {
        let r1 = builder().build(None).unwrap();
        let r2 = builder().build(None).unwrap();
        assert_eq!(r1.id, r2.id);
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_id_is_digest_of_body() {
        let receipt = builder().build(None).unwrap();
        assert_eq!(receipt.body.compute_id().unwrap(), receipt.id);
    }

    #[test]
    fn test_any_field_change_changes_id() {
        let base = builder().build(None).unwrap().id;

        let later = builder().timestamp(1).build(None).unwrap().id;
        assert_ne!(base, later);

        let other_meta = builder()
            .run_metadata(json!({"engine": "qic", "backend": "other"}))
            .build(None)
            .unwrap()
            .id;
        assert_ne!(base, other_meta);
    }

    #[test]
    fn test_claim_order_is_part_of_id() {
        let forward = builder().build(None).unwrap();
        let mut body = forward.body.clone();
        body.claims.reverse();
        assert_ne!(body.compute_id().unwrap(), forward.id);
    }

    #[test]
    fn test_signed_receipt() {
        let keypair = Keypair::from_seed(&[0x42; 32]);
        let receipt = builder().build(Some(&keypair)).unwrap();

        assert_eq!(receipt.body.signer_public_key, Some(keypair.public_key()));
        assert_eq!(receipt.signatures.len(), 1);
        assert!(receipt.signatures[0].starts_with("ed25519:"));

        let SignatureEntry::Ed25519(sig) = SignatureEntry::parse(&receipt.signatures[0]).unwrap()
        else {
            panic!("expected an ed25519 entry");
        };
        let message = receipt.body.signed_message().unwrap();
        assert!(keypair.public_key().verify(&message, &sig).is_ok());
    }

    #[test]
    fn test_signer_changes_id() {
        let unsigned = builder().build(None).unwrap();
        let signed = builder()
            .build(Some(&Keypair::from_seed(&[1; 32])))
            .unwrap();
        assert_ne!(unsigned.id, signed.id);
    }

    #[test]
    fn test_signing_is_deterministic() {
        let keypair = Keypair::from_seed(&[9; 32]);
        let a = builder().build(Some(&keypair)).unwrap();
        let b = builder().build(Some(&keypair)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_inconsistent_chain() {
        let claims = claims();
        let mut chain = ChainBuilder::new(&claims)
            .step(&[MANIFEST], &[RESULTS])
            .unwrap()
            .finish()
            .unwrap();
        chain[0].outputs_sha256 = Sha256Hash::hash(b"forged");

        let err = ReceiptBuilder::new(claims, chain).build(None).unwrap_err();
        assert!(matches!(err, CoreError::ChainInconsistent(0)));
    }

    #[test]
    fn test_rejects_non_object_metadata() {
        let err = builder().run_metadata(json!([1, 2])).build(None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidMetadata));
    }

    #[test]
    fn test_json_roundtrip_preserves_id() {
        let receipt = builder()
            .run_metadata(json!({"engine": "qic", "fidelity": 0.9923, "depth": 42, "offset": -3}))
            .build(Some(&Keypair::from_seed(&[5; 32])))
            .unwrap();
        let text = receipt.to_json_pretty().unwrap();
        assert!(text.ends_with('\n'));

        let parsed = Receipt::from_json(text.as_bytes()).unwrap();
        assert_eq!(parsed, receipt);
        assert_eq!(parsed.body.compute_id().unwrap(), receipt.id);
    }

    #[test]
    fn test_document_field_order() {
        let text = builder().build(None).unwrap().to_json_pretty().unwrap();
        let pos = |k: &str| text.find(&format!("\"{k}\"")).unwrap();
        assert!(pos("schema_version") < pos("id"));
        assert!(pos("id") < pos("claims"));
        assert!(pos("checkpoints") < pos("signatures"));
        assert!(pos("signatures") < pos("timestamp"));
        assert!(pos("timestamp") < pos("run_metadata"));
    }

    #[test]
    fn test_from_json_missing_field() {
        let err = Receipt::from_json(br#"{"schema_version": "0.3"}"#).unwrap_err();
        assert!(matches!(err, CoreError::MalformedReceipt(_)));
    }
}
