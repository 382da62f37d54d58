//! Source provenance: git revisions of the working tree.
//!
//! Only the local `git` binary is consulted. A directory without a `.git`
//! entry, or any git failure, is recorded as `"unknown"`.

use std::path::Path;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::debug;

/// Revision recorded when none can be determined.
pub const UNKNOWN_REVISION: &str = "unknown";

/// Contents of `provenance.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub root: String,
    #[serde(rename = "external/qic", skip_serializing_if = "Option::is_none")]
    pub external_qic: Option<String>,
    #[serde(rename = "external/hierarchy", skip_serializing_if = "Option::is_none")]
    pub external_hierarchy: Option<String>,
}

impl Provenance {
    /// Provenance for an engine run: the root and both engine checkouts.
    pub fn for_engines(root: &Path) -> Self {
        Self {
            root: git_head(root),
            external_qic: Some(git_head(&root.join("external").join("qic"))),
            external_hierarchy: Some(git_head(&root.join("external").join("hierarchy"))),
        }
    }

    /// Provenance for a wrapped folder: the root only.
    pub fn root_only(root: &Path) -> Self {
        Self {
            root: git_head(root),
            external_qic: None,
            external_hierarchy: None,
        }
    }
}

/// HEAD commit of the repository at `repo`, or [`UNKNOWN_REVISION`].
///
/// The `.git` check keeps an uninitialised submodule from reporting its
/// parent's HEAD.
pub fn git_head(repo: &Path) -> String {
    if !repo.join(".git").exists() {
        return UNKNOWN_REVISION.to_string();
    }
    let output = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["rev-parse", "HEAD"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();
    match output {
        Ok(out) if out.status.success() => {
            let head = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if head.is_empty() {
                UNKNOWN_REVISION.to_string()
            } else {
                head
            }
        }
        Ok(out) => {
            debug!(repo = %repo.display(), status = %out.status, "git rev-parse failed");
            UNKNOWN_REVISION.to_string()
        }
        Err(err) => {
            debug!(repo = %repo.display(), error = %err, "git unavailable");
            UNKNOWN_REVISION.to_string()
        }
    }
}
