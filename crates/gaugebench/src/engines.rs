//! Mock benchmark engines.
//!
//! The engines are opaque producers: each yields a manifest and a results
//! document of an agreed JSON shape. The receipt machinery never looks inside
//! them beyond digesting the bytes written to disk.

use serde::Serialize;

/// A benchmark engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Engine {
    /// Gate-based circuit engine.
    Qic { backend: String, shots: u32 },
    /// Annealing engine.
    Hierarchy { sampler: String, n: u32, k: u32 },
}

impl Engine {
    pub const DEFAULT_SHOTS: u32 = 1024;
    pub const DEFAULT_N: u32 = 8;
    pub const DEFAULT_K: u32 = 4;

    pub fn qic(backend: impl Into<String>, shots: u32) -> Self {
        Self::Qic {
            backend: backend.into(),
            shots,
        }
    }

    pub fn hierarchy(sampler: impl Into<String>, n: u32, k: u32) -> Self {
        Self::Hierarchy {
            sampler: sampler.into(),
            n,
            k,
        }
    }

    /// Engine name as recorded in manifests.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Qic { .. } => "qic",
            Self::Hierarchy { .. } => "hierarchy",
        }
    }

    /// The backend or sampler the run targets.
    pub fn target(&self) -> &str {
        match self {
            Self::Qic { backend, .. } => backend,
            Self::Hierarchy { sampler, .. } => sampler,
        }
    }

    pub fn manifest(&self, run_id: &str, created_at: &str) -> EngineDocument {
        match self {
            Self::Qic { backend, shots } => EngineDocument::QicManifest(QicManifest {
                run_id: run_id.to_string(),
                engine: "qic",
                backend: backend.clone(),
                shots: *shots,
                created_at: created_at.to_string(),
            }),
            Self::Hierarchy { sampler, n, k } => {
                EngineDocument::HierarchyManifest(HierarchyManifest {
                    run_id: run_id.to_string(),
                    engine: "hierarchy",
                    sampler: sampler.clone(),
                    n: *n,
                    k: *k,
                    created_at: created_at.to_string(),
                })
            }
        }
    }

    /// Produce the (mock) measurement results.
    pub fn results(&self) -> EngineDocument {
        match self {
            Self::Qic { backend, shots } => EngineDocument::QicResults(QicResults {
                engine: "qic",
                backend: backend.clone(),
                shots: *shots,
                fidelity: 0.9923,
                gate_error_rate: 0.0012,
                depth: 42,
                two_qubit_gate_count: 87,
            }),
            Self::Hierarchy { sampler, n, k } => {
                EngineDocument::HierarchyResults(HierarchyResults {
                    engine: "hierarchy",
                    sampler: sampler.clone(),
                    n: *n,
                    k: *k,
                    energy_gap: 1.2047,
                    ground_state_probability: 0.8731,
                    chain_break_fraction: 0.0023,
                    num_reads: 1000,
                })
            }
        }
    }
}

/// A document an engine writes to its run directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineDocument {
    QicManifest(QicManifest),
    QicResults(QicResults),
    HierarchyManifest(HierarchyManifest),
    HierarchyResults(HierarchyResults),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QicManifest {
    pub run_id: String,
    pub engine: &'static str,
    pub backend: String,
    pub shots: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QicResults {
    pub engine: &'static str,
    pub backend: String,
    pub shots: u32,
    pub fidelity: f64,
    pub gate_error_rate: f64,
    pub depth: u32,
    pub two_qubit_gate_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyManifest {
    pub run_id: String,
    pub engine: &'static str,
    pub sampler: String,
    #[serde(rename = "N")]
    pub n: u32,
    #[serde(rename = "K")]
    pub k: u32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyResults {
    pub engine: &'static str,
    pub sampler: String,
    #[serde(rename = "N")]
    pub n: u32,
    #[serde(rename = "K")]
    pub k: u32,
    pub energy_gap: f64,
    pub ground_state_probability: f64,
    pub chain_break_fraction: f64,
    pub num_reads: u32,
}
