//! Wrapping third-party result folders into verifiable runs.
//!
//! The folder's files are copied verbatim into `<out>/inputs/`, each becoming
//! an `input:<rel>` claim on the inputs side of the checkpoint. The source
//! folder is never modified.

use std::fs;
use std::path::{Component, Path, PathBuf};

use gaugebench_core::claim::{input_claim_name, MANIFEST, PROVENANCE, RESULTS};
use gaugebench_store::{ArtifactPath, ArtifactStore, FsRunStore, StoreError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ProduceConfig;
use crate::error::{Error, Result};
use crate::produce::{iso_timestamp, new_run_id, now_millis, provenance_root, seal_run, RunLayout, RunOutput};
use crate::provenance::Provenance;

/// Directory names never descended into.
pub const SKIP_DIR_NAMES: &[&str] = &[
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "env",
    ".env",
    "node_modules",
];

/// Key material is never copied.
pub const SKIP_SUFFIXES: &[&str] = &[".key", ".pem", ".p12", ".pfx", ".crt", ".cer", ".der"];

/// What to wrap and how to label it.
#[derive(Debug, Clone)]
pub struct WrapRequest {
    pub input_dir: PathBuf,
    pub out_dir: PathBuf,
    pub engine: String,
    pub backend: String,
}

#[derive(Serialize)]
struct WrapManifest<'a> {
    run_id: &'a str,
    engine: &'a str,
    backend: &'a str,
    input_source: String,
    input_file_count: usize,
    created_at: String,
}

#[derive(Serialize)]
struct WrapResults<'a> {
    engine: &'a str,
    backend: &'a str,
    input_file_count: usize,
    input_files: &'a [String],
    total_bytes: u64,
}

/// Whether a `/`-separated relative path is excluded from wrapping.
///
/// Hidden components, cache and virtualenv directories, and key material.
pub fn should_skip(rel: &str) -> bool {
    if rel
        .split('/')
        .any(|part| part.starts_with('.') || SKIP_DIR_NAMES.contains(&part))
    {
        return true;
    }
    let name = rel.rsplit('/').next().unwrap_or(rel).to_ascii_lowercase();
    SKIP_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Relative paths of every file to wrap, sorted.
pub fn collect_inputs(input_dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    walk(input_dir, "", &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, prefix: &str, files: &mut Vec<String>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.contains('\\') {
            warn!(path = %path.display(), "skipping file name containing a backslash");
            continue;
        }
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if should_skip(&rel) {
            debug!(rel = %rel, "excluded from wrap");
            continue;
        }

        let file_type = entry.file_type().map_err(|e| StoreError::io(&path, e))?;
        if file_type.is_dir() {
            walk(&path, &rel, files)?;
        } else {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => files.push(rel),
                Ok(_) => debug!(rel = %rel, "skipping non-regular file"),
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable entry")
                }
            }
        }
    }
    Ok(())
}

/// Absolute, symlink-resolved form of a path that may not exist yet.
fn resolve(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| StoreError::io(path, e))?;
        cwd.join(path)
    };

    let mut existing = absolute.as_path();
    let mut rest = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(base) => return Ok(rest.iter().rev().fold(base, |acc, name| acc.join(name))),
            Err(_) => match (existing.parent(), existing.components().last()) {
                (Some(parent), Some(Component::Normal(name))) => {
                    rest.push(name);
                    existing = parent;
                }
                _ => return Ok(absolute),
            },
        }
    }
}

/// Wrap `request.input_dir` into a sealed run at `request.out_dir`.
pub fn wrap_folder(request: &WrapRequest, config: &ProduceConfig) -> Result<RunOutput> {
    if !request.input_dir.is_dir() {
        return Err(Error::NotADirectory(request.input_dir.clone()));
    }
    let input = resolve(&request.input_dir)?;
    let output = resolve(&request.out_dir)?;
    if input.starts_with(&output) || output.starts_with(&input) {
        return Err(Error::Overlap { input, output });
    }

    let files = collect_inputs(&input)?;
    let store = FsRunStore::new(&output).with_chunk_size(config.chunk_size);
    store.create()?;

    let mut total_bytes = 0u64;
    let mut input_claims = Vec::with_capacity(files.len());
    for rel in &files {
        let claim = input_claim_name(rel);
        let dst = store.path_of(&ArtifactPath::for_claim(&claim)?);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let src = rel.split('/').fold(input.clone(), |acc, c| acc.join(c));
        total_bytes += fs::copy(&src, &dst).map_err(|e| StoreError::io(&src, e))?;
        input_claims.push(claim);
    }

    let timestamp = config.timestamp.unwrap_or_else(now_millis);
    let run_id = new_run_id();
    store.write_json(
        &ArtifactPath::for_claim(MANIFEST)?,
        &WrapManifest {
            run_id: &run_id,
            engine: &request.engine,
            backend: &request.backend,
            input_source: input.display().to_string(),
            input_file_count: files.len(),
            created_at: iso_timestamp(timestamp),
        },
    )?;
    store.write_json(
        &ArtifactPath::for_claim(PROVENANCE)?,
        &Provenance::root_only(&provenance_root(config)),
    )?;
    store.write_json(
        &ArtifactPath::for_claim(RESULTS)?,
        &WrapResults {
            engine: &request.engine,
            backend: &request.backend,
            input_file_count: files.len(),
            input_files: &files,
            total_bytes,
        },
    )?;

    let mut layout = RunLayout {
        claims: vec![MANIFEST.into(), PROVENANCE.into()],
        inputs: vec![MANIFEST.into(), PROVENANCE.into()],
        outputs: vec![RESULTS.into()],
    };
    layout.claims.extend(input_claims.iter().cloned());
    layout.claims.push(RESULTS.into());
    layout.inputs.extend(input_claims);

    let metadata = serde_json::json!({
        "run_id": run_id,
        "engine": request.engine,
        "backend": request.backend,
    });
    let receipt = seal_run(&store, &layout, metadata, timestamp, config)?;
    info!(files = files.len(), total_bytes, input = %input.display(), "wrapped folder");

    Ok(RunOutput {
        dir: output,
        receipt,
    })
}
