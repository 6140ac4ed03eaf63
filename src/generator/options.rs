//! Generator options.
//!
//! Everything the generated bundle depends on besides the topology itself.
//! Output is a pure function of `(TopologyConfig, GeneratorOptions)`.

use serde::{Deserialize, Serialize};

/// Knobs that shape the generated bundle without being part of a topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// `required_version` constraint in the terraform block
    pub terraform_version: String,

    /// Version constraint for both the google and google-beta providers
    pub google_provider_version: String,

    /// ASN of every Cloud Router
    pub router_asn: u32,

    /// Machine type for workloads that do not name one
    pub default_machine_type: String,

    /// Boot disk size of compute instances, in GB
    pub compute_disk_size_gb: u32,

    /// Boot disk size of cluster nodes, in GB
    pub node_disk_size_gb: u32,

    /// Container image deployed to serverless services
    pub serverless_image: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            terraform_version: ">= 1.0".to_string(),
            google_provider_version: "~> 5.0".to_string(),
            router_asn: 64514,
            default_machine_type: "e2-medium".to_string(),
            compute_disk_size_gb: 20,
            node_disk_size_gb: 50,
            serverless_image: "gcr.io/cloudrun/hello".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_keep_defaults() {
        let options: GeneratorOptions = toml::from_str("router_asn = 65010").unwrap();
        assert_eq!(options.router_asn, 65010);
        assert_eq!(options.default_machine_type, "e2-medium");
        assert_eq!(options.google_provider_version, "~> 5.0");
    }
}
