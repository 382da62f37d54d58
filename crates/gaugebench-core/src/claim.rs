//! Claims: named bindings of artifacts to their digests.
//!
//! A claim name is either a logical role (`manifest`, `results`,
//! `provenance`) or `input:<relative_path>` for a wrapped third-party file.
//! Claims keep insertion order and names are unique within a receipt.

use serde::{Deserialize, Serialize};

use crate::crypto::Sha256Hash;
use crate::error::{CoreError, Result};

/// Claim name of the run manifest.
pub const MANIFEST: &str = "manifest";
/// Claim name of the results blob.
pub const RESULTS: &str = "results";
/// Claim name of the git provenance record.
pub const PROVENANCE: &str = "provenance";
/// Prefix of claims for wrapped input files.
pub const INPUT_PREFIX: &str = "input:";

/// Claim name for a wrapped input file.
pub fn input_claim_name(relative_path: &str) -> String {
    format!("{INPUT_PREFIX}{relative_path}")
}

/// A single claim: an artifact name and the digest of its bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub name: String,
    pub sha256: Sha256Hash,
}

impl Claim {
    /// Create a claim from an already-computed digest.
    pub fn new(name: impl Into<String>, sha256: Sha256Hash) -> Self {
        Self {
            name: name.into(),
            sha256,
        }
    }

    /// Create a claim by digesting in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Self {
        Self::new(name, Sha256Hash::hash(data))
    }
}

/// An ordered set of claims with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet {
    claims: Vec<Claim>,
}

impl ClaimSet {
    /// Create an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, rejecting empty or duplicate names.
    pub fn from_claims(claims: Vec<Claim>) -> Result<Self> {
        let mut set = Self::new();
        for claim in claims {
            set.push(claim)?;
        }
        Ok(set)
    }

    /// Append a claim.
    pub fn push(&mut self, claim: Claim) -> Result<()> {
        if claim.name.is_empty() {
            return Err(CoreError::EmptyClaimName);
        }
        if self.contains(&claim.name) {
            return Err(CoreError::DuplicateClaim(claim.name));
        }
        self.claims.push(claim);
        Ok(())
    }

    /// Append a claim built from a name and digest.
    pub fn insert(&mut self, name: impl Into<String>, sha256: Sha256Hash) -> Result<()> {
        self.push(Claim::new(name, sha256))
    }

    /// Look up a claim by name.
    pub fn get(&self, name: &str) -> Option<&Claim> {
        self.claims.iter().find(|c| c.name == name)
    }

    /// Check whether a name is claimed.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Claim> {
        self.claims.iter()
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn as_slice(&self) -> &[Claim] {
        &self.claims
    }

    pub fn into_vec(self) -> Vec<Claim> {
        self.claims
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.claims.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut set = ClaimSet::new();
        set.insert(RESULTS, Sha256Hash::hash(b"r")).unwrap();
        set.insert(MANIFEST, Sha256Hash::hash(b"m")).unwrap();

        let names: Vec<_> = set.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["results", "manifest"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut set = ClaimSet::new();
        set.insert(MANIFEST, Sha256Hash::hash(b"a")).unwrap();
        let err = set.insert(MANIFEST, Sha256Hash::hash(b"b")).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateClaim(name) if name == "manifest"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = ClaimSet::from_claims(vec![Claim::from_bytes("", b"x")]).unwrap_err();
        assert!(matches!(err, CoreError::EmptyClaimName));
    }

    #[test]
    fn test_input_claim_name() {
        let claim = Claim::from_bytes(input_claim_name("data/a.txt"), b"a");
        assert_eq!(claim.name, "input:data/a.txt");
    }

    #[test]
    fn test_serializes_as_list() {
        let set = ClaimSet::from_claims(vec![Claim::new(
            MANIFEST,
            Sha256Hash::from_bytes([0; 32]),
        )])
        .unwrap();
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"name": "manifest", "sha256": format!("sha256:{}", "00".repeat(32))}])
        );
    }
}
