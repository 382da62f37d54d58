//! Command implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gaugebench::{
    produce_run, verify_run, wrap_folder, Engine, ProduceConfig, VerificationReport,
    VerifyConfig, WrapRequest,
};
use gaugebench_store::{generate_key_file, resolve_signing};
use tracing::info;

fn produce_config(key: Option<&Path>) -> ProduceConfig {
    ProduceConfig::default().with_signing(resolve_signing(key))
}

/// `gaugebench run qic|hierarchy`
pub fn run(out: &Path, engine: &Engine, key: Option<&Path>) -> Result<()> {
    let output = produce_run(out, engine, &produce_config(key))
        .with_context(|| format!("{} run into {} failed", engine.name(), out.display()))?;
    println!("Run complete. Receipt ID: {}", output.receipt.id);
    Ok(())
}

/// `gaugebench wrap`
pub fn wrap(
    input_dir: PathBuf,
    out_dir: PathBuf,
    engine: String,
    backend: String,
    key: Option<&Path>,
) -> Result<()> {
    let request = WrapRequest {
        input_dir,
        out_dir,
        engine,
        backend,
    };
    let output = wrap_folder(&request, &produce_config(key)).with_context(|| {
        format!(
            "wrapping {} into {} failed",
            request.input_dir.display(),
            request.out_dir.display()
        )
    })?;
    println!("Wrap complete. Receipt ID: {}", output.receipt.id);
    Ok(())
}

/// `gaugebench verify`; returns the process exit code.
pub fn verify(dir: &Path, require_signature: bool) -> i32 {
    let config = VerifyConfig::default().require_signature(require_signature);
    let report = verify_run(dir, &config);
    print_report(&report);
    report.outcome.exit_code()
}

fn print_report(report: &VerificationReport) {
    if let Some(error) = &report.error {
        eprintln!("{}: {error}", report.outcome);
        return;
    }

    println!("{}", report.outcome);
    if let Some(id) = &report.receipt_id {
        println!("  receipt: {id}");
    }
    for mismatch in &report.mismatches {
        println!("  - {mismatch}");
    }
    for caution in &report.cautions {
        println!("  ! {caution}");
    }
}

/// `gaugebench keygen`
pub fn keygen(path: &Path) -> Result<()> {
    let keypair = generate_key_file(path)
        .with_context(|| format!("failed to create key file {}", path.display()))?;
    info!(path = %path.display(), "generated signing key");
    println!("Public key: {}", keypair.public_key().to_base64());
    Ok(())
}
