//! Test fixtures and helpers.
//!
//! Common setup code for integration tests. Helpers panic on I/O failure;
//! they are meant for tests only.

use std::fs;
use std::path::{Path, PathBuf};

use gaugebench::{produce_run, seal_run, wrap_folder, Engine, ProduceConfig, RunLayout, WrapRequest};
use gaugebench_core::claim::{MANIFEST, RESULTS};
use gaugebench_core::{Keypair, Receipt, SigningCapability};
use gaugebench_store::{ArtifactStore, FsRunStore, RECEIPT_FILE};
use serde_json::Value;
use tempfile::TempDir;

/// Timestamp used by every fixture run.
pub const FIXTURE_TIMESTAMP: i64 = 1_736_870_400_000;

/// A temporary workspace with a deterministic keypair.
pub struct RunFixture {
    pub dir: TempDir,
    pub keypair: Keypair,
}

impl RunFixture {
    /// Create a new fixture with the default seed.
    pub fn new() -> Self {
        Self::with_seed([0x42; 32])
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// A path inside the fixture's directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Production config with a fixed timestamp and no signer.
    pub fn unsigned_config(&self) -> ProduceConfig {
        ProduceConfig::default()
            .with_timestamp(FIXTURE_TIMESTAMP)
            .with_provenance_root(self.dir.path())
    }

    /// Production config signing with the fixture keypair.
    pub fn signed_config(&self) -> ProduceConfig {
        self.unsigned_config()
            .with_signing(SigningCapability::Available(self.keypair.clone()))
    }

    /// The minimal run: `manifest.json = {"shots": 1000}`,
    /// `results.json = {"gate_error_rate": 0.002}`, unsigned.
    pub fn produce_e2e(&self) -> PathBuf {
        self.produce_minimal("e2e", &self.unsigned_config())
    }

    /// The minimal run, signed with the fixture keypair.
    pub fn produce_e2e_signed(&self) -> PathBuf {
        self.produce_minimal("e2e-signed", &self.signed_config())
    }

    fn produce_minimal(&self, name: &str, config: &ProduceConfig) -> PathBuf {
        let out = self.path(name);
        fs::create_dir_all(&out).expect("create run dir");
        fs::write(out.join("manifest.json"), "{\"shots\": 1000}\n").expect("write manifest");
        fs::write(out.join("results.json"), "{\"gate_error_rate\": 0.002}\n")
            .expect("write results");

        let layout = RunLayout {
            claims: vec![MANIFEST.into(), RESULTS.into()],
            inputs: vec![MANIFEST.into()],
            outputs: vec![RESULTS.into()],
        };
        let metadata = serde_json::json!({"engine": "qic", "backend": "e2e"});
        seal_run(
            &FsRunStore::new(&out),
            &layout,
            metadata,
            FIXTURE_TIMESTAMP,
            config,
        )
        .expect("seal run");
        out
    }

    /// A full qic engine run.
    pub fn produce_qic(&self, signed: bool) -> PathBuf {
        let out = self.path(if signed { "qic-signed" } else { "qic" });
        let config = if signed {
            self.signed_config()
        } else {
            self.unsigned_config()
        };
        produce_run(&out, &Engine::qic("ibm_brisbane", Engine::DEFAULT_SHOTS), &config)
            .expect("produce qic run");
        out
    }

    /// Create a third-party folder with `files` and wrap it.
    ///
    /// Returns `(input_dir, run_dir)`.
    pub fn wrap(&self, files: &[(&str, &[u8])]) -> (PathBuf, PathBuf) {
        let input = self.path("third-party");
        for (rel, contents) in files {
            let path = input.join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create input dir");
            }
            fs::write(path, contents).expect("write input file");
        }
        let request = WrapRequest {
            input_dir: input.clone(),
            out_dir: self.path("wrapped"),
            engine: "vendor-bench".into(),
            backend: "cluster-a".into(),
        };
        let run = wrap_folder(&request, &self.unsigned_config()).expect("wrap folder");
        (input, run.dir)
    }
}

impl Default for RunFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Flip the lowest bit of the byte at `offset`.
pub fn flip_byte(path: &Path, offset: usize) {
    let mut bytes = fs::read(path).expect("read artifact");
    bytes[offset] ^= 0x01;
    fs::write(path, bytes).expect("write artifact");
}

/// Load the receipt of a run directory.
pub fn read_receipt(run: &Path) -> Receipt {
    let bytes = FsRunStore::new(run).read_receipt().expect("read receipt");
    Receipt::from_json(&bytes).expect("parse receipt")
}

/// Edit `receipt.json` as raw JSON, bypassing every invariant.
pub fn edit_receipt(run: &Path, edit: impl FnOnce(&mut Value)) {
    let path = run.join(RECEIPT_FILE);
    let mut doc: Value =
        serde_json::from_slice(&fs::read(&path).expect("read receipt")).expect("parse receipt");
    edit(&mut doc);
    fs::write(&path, serde_json::to_vec_pretty(&doc).expect("encode receipt"))
        .expect("write receipt");
}
