//! Topology model: the single input of the generator.
//!
//! A topology is a fully populated tree with five sections:
//!
//! - `identity`: project and application name (naming root of every resource)
//! - `network`: regions, CIDRs, subnet flags
//! - `connectivity`: on-premises, multi-cloud and site-to-site links
//! - `security`: feature flags and firewall rules
//! - `workloads`: compute, orchestrated and serverless workloads
//!
//! Documents use camelCase keys and may be YAML, JSON or TOML:
//!
//! ```yaml
//! identity:
//!   projectId: acme-prod
//!   applicationName: shop
//! network:
//!   primaryRegion: us-central1
//!   vpcCidr: 10.0.0.0/16
//!   primarySubnetCidr: 10.0.1.0/24
//! connectivity:
//!   onPrem:
//!     enabled: true
//!     type: vpn
//! workloads:
//!   - name: web
//!     kind: compute
//!     region: us-central1
//!     scaling: { min: 1, max: 3 }
//! ```

pub mod cidr;
pub mod connectivity;
pub mod network;
pub mod security;
pub mod validate;
pub mod workload;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

pub use cidr::Ipv4Cidr;
pub use connectivity::{
    CloudProvider, ConnectionType, ConnectivityConfig, MultiCloudConnectivity,
    OnPremConnectivity, ProviderLink, Redundancy, SiteToSiteConnectivity,
};
pub use network::NetworkConfig;
pub use security::{AllowedTraffic, Direction, FirewallRule, SecurityConfig};
pub use workload::{MachineProfile, Scaling, Workload, WorkloadKind};

/// Project and application naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Google Cloud project the bundle targets.
    pub project_id: String,

    /// Lowercase, digits and hyphens; prefixes every symbolic name.
    pub application_name: String,
}

/// The complete description of a desired network topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopologyConfig {
    pub identity: Identity,

    pub network: NetworkConfig,

    #[serde(default)]
    pub connectivity: ConnectivityConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub workloads: Vec<Workload>,
}

impl TopologyConfig {
    /// Application name, the root of every generated name.
    pub fn application_name(&self) -> &str {
        &self.identity.application_name
    }

    /// Whether any workload has the given kind.
    pub fn has_workload_kind(&self, kind: &WorkloadKind) -> bool {
        self.workloads.iter().any(|w| &w.kind == kind)
    }

    /// Parse a topology document without validating it.
    ///
    /// `extension` selects the format (`yaml`/`yml`, `json`, `toml`); anything
    /// else is tried as YAML, which also accepts JSON.
    ///
    /// A document that is not well-formed fails with [`Error::Load`]. A
    /// well-formed document with a missing field, an unknown enum value or a
    /// value of the wrong type fails with [`Error::Configuration`] at the
    /// offending field path.
    pub fn parse(content: &str, extension: &str, origin: &Path) -> Result<Self> {
        match extension {
            "json" => serde_json::from_str::<serde_json::Value>(content)
                .map(drop)
                .map_err(|e| Error::load(origin, e.to_string(), Some(Box::new(e)))),
            "toml" => toml::from_str::<toml::Table>(content)
                .map(drop)
                .map_err(|e| Error::load(origin, e.to_string(), Some(Box::new(e)))),
            _ => serde_yaml::from_str::<serde_yaml::Value>(content)
                .map(drop)
                .map_err(|e| Error::load(origin, e.to_string(), Some(Box::new(e)))),
        }?;

        match extension {
            "json" => serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_str(content))
                .map_err(data_error),
            "toml" => serde_path_to_error::deserialize(toml::Deserializer::new(content)).map_err(data_error),
            _ => serde_path_to_error::deserialize(serde_yaml::Deserializer::from_str(content))
                .map_err(data_error),
        }
    }

    /// Load and validate a topology document.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::load(path, format!("cannot read file: {}", e), Some(Box::new(e)))
        })?;
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = Self::parse(&content, extension, path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Well-formed document whose content does not fit the model.
fn data_error<E: std::fmt::Display>(err: serde_path_to_error::Error<E>) -> Error {
    Error::configuration(err.path().to_string(), err.inner().to_string())
}
