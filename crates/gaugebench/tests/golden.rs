//! Golden receipt vectors for cross-implementation verification.
//!
//! Every implementation must produce, for the same artifacts, metadata and
//! timestamp:
//! - identical claim digests
//! - identical checkpoint digests
//! - identical receipt id
//! - identical signature (deterministic Ed25519)

use gaugebench::core::chain::ChainBuilder;
use gaugebench::core::claim::{MANIFEST, RESULTS};
use gaugebench::core::{Claim, ClaimSet, Keypair, ReceiptBuilder, ReceiptSigner};
use gaugebench::Receipt;
use serde_json::json;

const MANIFEST_BYTES: &[u8] = b"{\"shots\": 1000}\n";
const RESULTS_BYTES: &[u8] = b"{\"gate_error_rate\": 0.002}\n";
const TIMESTAMP: i64 = 1_736_870_400_000;

fn build(signer: Option<&Keypair>) -> Receipt {
    let claims = ClaimSet::from_claims(vec![
        Claim::from_bytes(MANIFEST, MANIFEST_BYTES),
        Claim::from_bytes(RESULTS, RESULTS_BYTES),
    ])
    .unwrap();
    let chain = ChainBuilder::new(&claims)
        .step(&[MANIFEST], &[RESULTS])
        .unwrap()
        .finish()
        .unwrap();
    ReceiptBuilder::new(claims, chain)
        .timestamp(TIMESTAMP)
        .run_metadata(json!({"engine": "qic", "backend": "e2e"}))
        .build(signer.map(|k| k as &dyn ReceiptSigner))
        .unwrap()
}

#[test]
fn golden_claim_and_chain_digests() {
    let receipt = build(None);
    assert_eq!(
        receipt.body.claims[0].sha256.to_string(),
        "sha256:a6a9b6af05a1e0add9cfe45d8b85c5e1c8f293f6fb47279184607bd951539c39"
    );
    assert_eq!(
        receipt.body.claims[1].sha256.to_string(),
        "sha256:e26c2bfb668b16cde45b2edb0d4e439e0e570be2da737e940b3616eb8d5cf10e"
    );

    let checkpoint = &receipt.body.checkpoints[0];
    assert_eq!(
        checkpoint.inputs_sha256.to_hex(),
        "5da056bc06101bd715d7cef091993b1a515217cf1f7097a6d683ac7715020a18"
    );
    assert_eq!(
        checkpoint.outputs_sha256.to_hex(),
        "3e188f2bc373d6f2043378e96a7c85c90d310f7bdba22f21fe233b9a980e7a72"
    );
}

#[test]
fn golden_unsigned_receipt_id() {
    let receipt = build(None);
    assert_eq!(
        receipt.id.to_string(),
        "car:7cdbe01d8c330c3a7508ecb643f64f5ed05de31ced76c75aaeaf0cde82da4cec"
    );
    assert_eq!(receipt.signatures, ["unsigned:placeholder"]);
}

#[test]
fn golden_signed_receipt() {
    let keypair = Keypair::from_seed(&[0x42; 32]);
    let receipt = build(Some(&keypair));

    assert_eq!(
        keypair.public_key().to_base64(),
        "IVL40Zt5HSRFMkLhXy6rbLfP+ntqXtMAl5YOBpiB2xI="
    );
    assert_eq!(
        receipt.id.to_string(),
        "car:7f7da414d899b8bdbeecf26472e5fa2f24d6355f330bb4df393efa68a5c7e9d0"
    );
    assert_eq!(
        receipt.signatures,
        ["ed25519:dPptniwlrpBfFQXcTIF4vDwMFg9cUuyATvGhlx5cjXDh1qmrMWTRSZl/CpkqYjg1q7Dz88PLbd85Vw6JkpOECA=="]
    );
}

#[test]
fn golden_receipt_survives_json() {
    let receipt = build(Some(&Keypair::from_seed(&[0x42; 32])));
    let text = receipt.to_json_pretty().unwrap();
    let parsed = Receipt::from_json(text.as_bytes()).unwrap();
    assert_eq!(parsed.body.compute_id().unwrap(), receipt.id);
}
