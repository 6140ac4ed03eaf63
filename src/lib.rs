//! # netform - Terraform Bundles for Google Cloud Network Topologies
//!
//! netform turns a declarative description of a multi-region network
//! topology into a ready-to-apply Terraform bundle. Generation is
//! deterministic: the same topology and options always produce
//! byte-identical text.
//!
//! ## Core Concepts
//!
//! - **Topology**: the single input; identity, network, connectivity,
//!   security and workloads
//! - **Sections**: generators for one concern each (APIs, network,
//!   on-premises links, multi-cloud hubs, security, workloads)
//! - **Identifier Registry**: hands out every symbolic resource name and
//!   rejects collisions
//! - **Assembler**: orders the sections, checks references and renders
//!   `main.tf`
//! - **Bundle**: `main.tf`, `variables.tf`, `terraform.tfvars`, `README.md`
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       TopologyConfig                         │
//! │              (serde model + fail-fast validation)            │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      Section generators                      │
//! │   services → network → on-prem → multi-cloud → security →    │
//! │                          workloads                           │
//! └──────────────────────────────────────────────────────────────┘
//!          │                     │                      │
//!          ▼                     ▼                      ▼
//! ┌─────────────────┐  ┌───────────────────┐  ┌──────────────────┐
//! │   Identifier    │  │  Reference graph  │  │     Variable     │
//! │    registry     │  │    (petgraph)     │  │    extractor     │
//! └─────────────────┘  └───────────────────┘  └──────────────────┘
//!                                │
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │             HCL renderer + artifact packager                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use netform::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let topology = TopologyConfig::from_file("topology.yaml")?;
//!     let bundle = Generator::default().generate(&topology)?;
//!     bundle.write_to("infra")?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    // Error handling
    pub use crate::error::{Error, Result};

    // Input model
    pub use crate::topology::{
        CloudProvider, ConnectionType, Direction, FirewallRule, NetworkConfig, Redundancy,
        TopologyConfig, Workload, WorkloadKind,
    };

    // Generation
    pub use crate::generator::{
        generate, ArtifactBundle, Generator, GeneratorOptions, Variable, VariableType,
    };

    // Cost
    pub use crate::cost::{CostBreakdown, CostEstimator, PricingClient};
}

// ============================================================================
// Modules
// ============================================================================

/// Tool settings (generator options, pricing, output, logging).
pub mod config;

/// Monthly cost estimation with optional live pricing.
pub mod cost;

/// Error types.
pub mod error;

/// Bundle generation.
pub mod generator;

/// HCL value model and renderer.
pub mod hcl;

/// Topology model, loading and validation.
pub mod topology;

pub use error::{Error, Result};

/// Returns the current version of netform.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Returns detailed version information including build metadata.
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        rust_version: option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown"),
        target: std::env::consts::ARCH,
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Detailed version information for the netform build.
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Semantic version string
    pub version: &'static str,
    /// Minimum Rust version required
    pub rust_version: &'static str,
    /// Target architecture
    pub target: &'static str,
    /// Build profile (debug or release)
    pub profile: &'static str,
}

impl std::fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "netform {} ({}, {})",
            self.version, self.target, self.profile
        )
    }
}
