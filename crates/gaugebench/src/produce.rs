//! Run production: write artifacts, digest them, build and persist the receipt.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use gaugebench_core::chain::ChainBuilder;
use gaugebench_core::claim::{ClaimSet, MANIFEST, PROVENANCE, RESULTS};
use gaugebench_core::{produce_receipt, Receipt, SigningCapability};
use gaugebench_store::{ArtifactPath, ArtifactStore, FsRunStore};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ProduceConfig;
use crate::engines::Engine;
use crate::error::Result;
use crate::provenance::Provenance;

/// A produced run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// The run directory.
    pub dir: PathBuf,
    /// The persisted receipt.
    pub receipt: Receipt,
}

/// Which claims feed which side of the single process checkpoint.
#[derive(Debug, Clone, Default)]
pub struct RunLayout {
    /// Every claim, in receipt order.
    pub claims: Vec<String>,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl RunLayout {
    /// `manifest`, `provenance` → `results`.
    pub fn standard() -> Self {
        Self {
            claims: vec![MANIFEST.into(), PROVENANCE.into(), RESULTS.into()],
            inputs: vec![MANIFEST.into(), PROVENANCE.into()],
            outputs: vec![RESULTS.into()],
        }
    }
}

/// Current time in Unix milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// ISO-8601 UTC rendering of a Unix-millisecond timestamp, `Z` suffixed.
pub fn iso_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A fresh run identifier.
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Digest the artifacts named by `layout`, chain them and persist the receipt.
///
/// Nothing is written unless the receipt builds completely.
pub fn seal_run<S: ArtifactStore>(
    store: &S,
    layout: &RunLayout,
    run_metadata: Value,
    timestamp: i64,
    config: &ProduceConfig,
) -> Result<Receipt> {
    let mut claims = ClaimSet::new();
    for name in &layout.claims {
        let digest = store.digest_artifact(&ArtifactPath::for_claim(name)?)?;
        claims.insert(name.clone(), digest)?;
    }

    let checkpoints = ChainBuilder::new(&claims)
        .step(layout.inputs.as_slice(), layout.outputs.as_slice())?
        .finish()?;

    if let SigningCapability::Unavailable { reason } = &config.signing {
        warn!(reason = %reason, "signing unavailable, receipt will carry the unsigned placeholder");
    }

    let receipt = produce_receipt(
        claims,
        checkpoints,
        run_metadata,
        timestamp,
        config.signing.signer(),
    )?;
    store.write_receipt(&receipt)?;
    info!(
        id = %receipt.id,
        location = %store.location(),
        signed = !receipt.is_unsigned(),
        "receipt written"
    );
    Ok(receipt)
}

/// Run a mock engine into `out_dir` and seal it with a receipt.
pub fn produce_run(out_dir: &Path, engine: &Engine, config: &ProduceConfig) -> Result<RunOutput> {
    let store = FsRunStore::new(out_dir).with_chunk_size(config.chunk_size);
    store.create()?;

    let timestamp = config.timestamp.unwrap_or_else(now_millis);
    let run_id = new_run_id();
    let created_at = iso_timestamp(timestamp);
    let root = provenance_root(config);

    store.write_json(
        &ArtifactPath::for_claim(MANIFEST)?,
        &engine.manifest(&run_id, &created_at),
    )?;
    store.write_json(
        &ArtifactPath::for_claim(PROVENANCE)?,
        &Provenance::for_engines(&root),
    )?;
    store.write_json(&ArtifactPath::for_claim(RESULTS)?, &engine.results())?;

    let metadata = serde_json::json!({
        "run_id": run_id,
        "engine": engine.name(),
        "backend": engine.target(),
    });
    let receipt = seal_run(&store, &RunLayout::standard(), metadata, timestamp, config)?;

    Ok(RunOutput {
        dir: out_dir.to_path_buf(),
        receipt,
    })
}

pub(crate) fn provenance_root(config: &ProduceConfig) -> PathBuf {
    config
        .provenance_root
        .clone()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
