//! End-to-end tests over real run directories.

use gaugebench::core::claim::{MANIFEST, RESULTS};
use gaugebench::core::UNSIGNED_PLACEHOLDER;
use gaugebench::store::{FsRunStore, RECEIPT_FILE};
use gaugebench::{
    seal_run, verify_run, ChainSide, Keypair, Mismatch, Outcome, RunLayout, VerifyConfig,
};
use gaugebench_testkit::fixtures::{edit_receipt, flip_byte, read_receipt};
use gaugebench_testkit::{RunFixture, FIXTURE_TIMESTAMP};
use serde_json::Value;

#[test]
fn e2e_run_verifies() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e();

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Verified, "{report:?}");
    assert_eq!(report.outcome.exit_code(), 0);
    assert!(report.mismatches.is_empty());
    assert_eq!(report.receipt_id, Some(read_receipt(&run).id));
}

#[test]
fn e2e_receipt_matches_golden_id() {
    let fixture = RunFixture::new();
    let receipt = read_receipt(&fixture.produce_e2e());
    assert_eq!(
        receipt.id.to_string(),
        "car:7cdbe01d8c330c3a7508ecb643f64f5ed05de31ced76c75aaeaf0cde82da4cec"
    );

    let signed = read_receipt(&fixture.produce_e2e_signed());
    assert_eq!(
        signed.id.to_string(),
        "car:7f7da414d899b8bdbeecf26472e5fa2f24d6355f330bb4df393efa68a5c7e9d0"
    );
}

#[test]
fn one_flipped_byte_names_the_claim() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e();
    flip_byte(&run.join("results.json"), 0);

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Tampered);
    assert_eq!(report.outcome.exit_code(), 1);
    assert_eq!(report.tampered_claims(), ["results"]);

    let Some(Mismatch::Claim {
        expected, actual, ..
    }) = report
        .mismatches
        .iter()
        .find(|m| matches!(m, Mismatch::Claim { .. }))
    else {
        panic!("no claim mismatch in {report:?}");
    };
    assert_ne!(expected, actual);
}

#[test]
fn forged_checkpoint_is_a_chain_mismatch() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e();
    let forged = format!("sha256:{}", "00".repeat(32));
    edit_receipt(&run, |doc| {
        doc["checkpoints"][0]["outputs_sha256"] = Value::String(forged);
    });

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Tampered);
    assert!(report.tampered_claims().is_empty());
    assert!(report.mismatches.iter().any(|m| matches!(
        m,
        Mismatch::Chain {
            index: 0,
            side: ChainSide::Outputs,
            ..
        }
    )));
}

#[test]
fn signed_run_verifies() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e_signed();

    let receipt = read_receipt(&run);
    assert!(!receipt.is_unsigned());
    assert_eq!(
        receipt.body.signer_public_key,
        Some(fixture.keypair.public_key())
    );

    let report = verify_run(&run, &VerifyConfig::default().require_signature(true));
    assert_eq!(report.outcome, Outcome::Verified, "{report:?}");
}

#[test]
fn swapped_public_key_invalidates_signature() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e_signed();
    let other = Keypair::from_seed(&[0x07; 32]).public_key().to_base64();
    edit_receipt(&run, |doc| {
        doc["signer_public_key"] = Value::String(other);
    });

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Tampered);
    assert!(report
        .mismatches
        .iter()
        .any(|m| matches!(m, Mismatch::SignatureInvalid { .. })));
}

#[test]
fn mutated_timestamp_breaks_id_and_signature() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e_signed();
    edit_receipt(&run, |doc| {
        doc["timestamp"] = Value::from(1_736_870_400_001i64);
    });

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Tampered);
    assert!(report
        .mismatches
        .iter()
        .any(|m| matches!(m, Mismatch::Id { .. })));
    assert!(report
        .mismatches
        .iter()
        .any(|m| matches!(m, Mismatch::SignatureInvalid { .. })));
    assert!(report.tampered_claims().is_empty());
}

#[test]
fn unsigned_receipt_carries_placeholder() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e();

    let receipt = read_receipt(&run);
    assert_eq!(receipt.signatures, [UNSIGNED_PLACEHOLDER]);
    assert!(receipt.body.signer_public_key.is_none());

    let raw: Value =
        serde_json::from_slice(&std::fs::read(run.join(RECEIPT_FILE)).unwrap()).unwrap();
    assert!(raw.get("signer_public_key").is_none());

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Verified);

    let strict = verify_run(&run, &VerifyConfig::default().require_signature(true));
    assert_eq!(strict.outcome, Outcome::Tampered);
    assert_eq!(strict.mismatches, [Mismatch::SignatureMissing]);
}

#[test]
fn signed_run_without_backend_is_unverifiable() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e_signed();

    let report = verify_run(&run, &VerifyConfig::without_backend());
    assert_eq!(report.outcome, Outcome::Unverifiable);
    assert_eq!(report.outcome.exit_code(), 3);
    assert!(report.mismatches.is_empty());
    assert_eq!(report.cautions.len(), 1);
}

#[test]
fn missing_receipt_is_an_error() {
    let fixture = RunFixture::new();
    let run = fixture.path("empty");
    std::fs::create_dir_all(&run).unwrap();

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Error);
    assert_eq!(report.outcome.exit_code(), 2);
    assert!(report.error.unwrap().contains("receipt not found"));
}

#[test]
fn garbage_receipt_is_an_error() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e();
    std::fs::write(run.join(RECEIPT_FILE), b"not json").unwrap();

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Error);
    assert!(report.receipt_id.is_none());
}

#[test]
fn qic_runs_verify() {
    let fixture = RunFixture::new();
    for signed in [false, true] {
        let run = fixture.produce_qic(signed);
        for file in ["manifest.json", "results.json", "provenance.json", RECEIPT_FILE] {
            assert!(run.join(file).is_file(), "{file} missing");
        }
        let report = verify_run(&run, &VerifyConfig::default());
        assert_eq!(report.outcome, Outcome::Verified, "{report:?}");
    }
}

#[test]
fn wrapped_input_change_names_the_file() {
    let fixture = RunFixture::new();
    let (_, run) = fixture.wrap(&[("a.txt", b"alpha\n"), ("b.txt", b"bravo\n")]);

    let clean = verify_run(&run, &VerifyConfig::default());
    assert_eq!(clean.outcome, Outcome::Verified, "{clean:?}");

    flip_byte(&run.join("inputs").join("b.txt"), 0);
    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Tampered);
    assert_eq!(report.tampered_claims(), ["input:b.txt"]);
}

#[test]
fn deleted_artifact_is_tampered() {
    let fixture = RunFixture::new();
    let run = fixture.produce_e2e();
    std::fs::remove_file(run.join("manifest.json")).unwrap();

    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Tampered);
    assert!(report
        .mismatches
        .iter()
        .any(|m| matches!(m, Mismatch::ArtifactUnreadable { name, .. } if name == "manifest")));
}

#[test]
fn float_metadata_survives_persistence() {
    let fixture = RunFixture::new();
    let run = fixture.path("floats");
    std::fs::create_dir_all(&run).unwrap();
    std::fs::write(run.join("manifest.json"), "{\"shots\": 1000}\n").unwrap();
    std::fs::write(run.join("results.json"), "{\"fidelity\": 0.98}\n").unwrap();

    let layout = RunLayout {
        claims: vec![MANIFEST.into(), RESULTS.into()],
        inputs: vec![MANIFEST.into()],
        outputs: vec![RESULTS.into()],
    };
    let metadata = serde_json::json!({
        "engine": "qic",
        "fidelity": 0.9856906946328695,
        "gate_error_rate": 0.1 + 0.2,
        "energy": -1.2047e-19,
    });
    let receipt = seal_run(
        &FsRunStore::new(&run),
        &layout,
        metadata,
        FIXTURE_TIMESTAMP,
        &fixture.signed_config(),
    )
    .unwrap();

    assert_eq!(read_receipt(&run), receipt);
    let report = verify_run(&run, &VerifyConfig::default());
    assert_eq!(report.outcome, Outcome::Verified, "{report:?}");
}
