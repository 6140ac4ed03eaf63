//! Workload descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a workload is run.
///
/// Parsed leniently so that an unknown kind survives deserialization and is
/// reported by validation with the workload's name attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkloadKind {
    /// Managed instance group behind an autoscaler
    Compute,
    /// Private GKE cluster with an autoscaling node pool
    Orchestrated,
    /// Cloud Run service
    Serverless,
    /// Anything else, kept verbatim for error reporting
    Unsupported(String),
}

impl WorkloadKind {
    /// Canonical identifier.
    pub fn as_str(&self) -> &str {
        match self {
            WorkloadKind::Compute => "compute",
            WorkloadKind::Orchestrated => "orchestrated",
            WorkloadKind::Serverless => "serverless",
            WorkloadKind::Unsupported(kind) => kind,
        }
    }
}

impl From<String> for WorkloadKind {
    fn from(kind: String) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "compute" | "compute-engine" | "vm" => WorkloadKind::Compute,
            "orchestrated" | "gke" | "kubernetes" => WorkloadKind::Orchestrated,
            "serverless" | "cloud-run" => WorkloadKind::Serverless,
            _ => WorkloadKind::Unsupported(kind),
        }
    }
}

impl From<&str> for WorkloadKind {
    fn from(kind: &str) -> Self {
        WorkloadKind::from(kind.to_string())
    }
}

impl From<WorkloadKind> for String {
    fn from(kind: WorkloadKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Replica or node bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scaling {
    pub min: u32,
    pub max: u32,
}

impl Default for Scaling {
    fn default() -> Self {
        Self { min: 1, max: 3 }
    }
}

/// Machine shape; unset fields fall back to generator defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MachineProfile {
    pub machine_type: Option<String>,
    #[serde(alias = "diskSize")]
    pub disk_size_gb: Option<u32>,
}

/// An application workload placed in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workload {
    pub name: String,

    #[serde(alias = "type")]
    pub kind: WorkloadKind,

    pub region: String,

    #[serde(default)]
    pub scaling: Scaling,

    #[serde(default, alias = "machineProfile")]
    pub machine: MachineProfile,
}
