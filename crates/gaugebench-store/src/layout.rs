//! Run-directory layout and the claim-name → path convention.

use std::fmt;
use std::path::{Path, PathBuf};

use gaugebench_core::claim::{INPUT_PREFIX, MANIFEST, PROVENANCE, RESULTS};

use crate::error::{Result, StoreError};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const PROVENANCE_FILE: &str = "provenance.json";
pub const RESULTS_FILE: &str = "results.json";
pub const RECEIPT_FILE: &str = "receipt.json";
/// Directory holding verbatim copies of wrapped files.
pub const INPUTS_DIR: &str = "inputs";

/// A validated, `/`-separated path relative to a run directory.
///
/// Components are never empty, `.` or `..`, so an `ArtifactPath` cannot point
/// outside the run it belongs to.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactPath(String);

impl ArtifactPath {
    /// Validate a relative path.
    pub fn new(relative: &str) -> Result<Self> {
        if relative.is_empty() {
            return Err(StoreError::InvalidPath("empty path".into()));
        }
        if relative.contains('\\') || relative.contains('\0') {
            return Err(StoreError::InvalidPath(relative.to_string()));
        }
        for component in relative.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(StoreError::InvalidPath(relative.to_string()));
            }
        }
        Ok(Self(relative.to_string()))
    }

    /// Resolve a claim name to the artifact it covers.
    ///
    /// | claim            | path              |
    /// |------------------|-------------------|
    /// | `manifest`       | `manifest.json`   |
    /// | `results`        | `results.json`    |
    /// | `provenance`     | `provenance.json` |
    /// | `input:<rel>`    | `inputs/<rel>`    |
    pub fn for_claim(name: &str) -> Result<Self> {
        match name {
            MANIFEST => Ok(Self(MANIFEST_FILE.into())),
            RESULTS => Ok(Self(RESULTS_FILE.into())),
            PROVENANCE => Ok(Self(PROVENANCE_FILE.into())),
            _ => match name.strip_prefix(INPUT_PREFIX) {
                Some(rel) => {
                    let rel = Self::new(rel)?;
                    Ok(Self(format!("{INPUTS_DIR}/{}", rel.0)))
                }
                None => Err(StoreError::UnknownClaim(name.to_string())),
            },
        }
    }

    /// The receipt file.
    pub fn receipt() -> Self {
        Self(RECEIPT_FILE.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Join onto a run directory.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, c| acc.join(c))
    }
}

impl fmt::Debug for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArtifactPath({})", self.0)
    }
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_claims() {
        assert_eq!(ArtifactPath::for_claim("manifest").unwrap().as_str(), "manifest.json");
        assert_eq!(ArtifactPath::for_claim("results").unwrap().as_str(), "results.json");
        assert_eq!(
            ArtifactPath::for_claim("provenance").unwrap().as_str(),
            "provenance.json"
        );
    }

    #[test]
    fn test_input_claims() {
        assert_eq!(
            ArtifactPath::for_claim("input:a.txt").unwrap().as_str(),
            "inputs/a.txt"
        );
        assert_eq!(
            ArtifactPath::for_claim("input:sub/dir/b.csv").unwrap().as_str(),
            "inputs/sub/dir/b.csv"
        );
    }

    #[test]
    fn test_rejects_escapes() {
        for bad in [
            "input:../receipt.json",
            "input:/etc/passwd",
            "input:a//b",
            "input:./a",
            "input:",
            "input:a\\..\\b",
        ] {
            assert!(
                matches!(ArtifactPath::for_claim(bad), Err(StoreError::InvalidPath(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_unknown_claim() {
        assert!(matches!(
            ArtifactPath::for_claim("git_context"),
            Err(StoreError::UnknownClaim(_))
        ));
    }

    #[test]
    fn test_to_path() {
        let p = ArtifactPath::for_claim("input:x/y.txt").unwrap();
        assert_eq!(
            p.to_path(Path::new("/runs/r1")),
            Path::new("/runs/r1").join("inputs").join("x").join("y.txt")
        );
    }
}
