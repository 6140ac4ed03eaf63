//! Network section of a topology: regions, CIDRs and subnet flags.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Regions, address ranges and subnet feature flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Region hosting the primary subnet, router and all connectivity.
    pub primary_region: String,

    /// Additional regions, each with its own subnet and router.
    #[serde(default)]
    pub secondary_regions: Vec<String>,

    /// Range covering the whole VPC.
    pub vpc_cidr: String,

    /// Range of the primary region's subnet.
    pub primary_subnet_cidr: String,

    /// Subnet range per secondary region.
    #[serde(default)]
    pub subnet_cidrs: IndexMap<String, String>,

    /// Let VMs without external IPs reach Google APIs.
    #[serde(default, alias = "enablePrivateGoogleAccess")]
    pub private_google_access: bool,

    /// Export VPC flow logs from every subnet.
    #[serde(default, alias = "enableFlowLogs")]
    pub flow_logs: bool,
}

impl NetworkConfig {
    /// All regions, primary first, then secondaries in input order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_region.as_str())
            .chain(self.secondary_regions.iter().map(String::as_str))
    }

    /// Whether the region is the primary or one of the secondaries.
    pub fn has_region(&self, region: &str) -> bool {
        self.regions().any(|r| r == region)
    }

    /// Whether the region is the primary region.
    pub fn is_primary(&self, region: &str) -> bool {
        self.primary_region == region
    }

    /// Subnet CIDR for a region.
    pub fn subnet_cidr(&self, region: &str) -> Option<&str> {
        if self.is_primary(region) {
            Some(self.primary_subnet_cidr.as_str())
        } else {
            self.subnet_cidrs.get(region).map(String::as_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> NetworkConfig {
        NetworkConfig {
            primary_region: "us-central1".into(),
            secondary_regions: vec!["us-east1".into(), "europe-west1".into()],
            vpc_cidr: "10.0.0.0/16".into(),
            primary_subnet_cidr: "10.0.1.0/24".into(),
            subnet_cidrs: IndexMap::from([
                ("us-east1".to_string(), "10.0.2.0/24".to_string()),
                ("europe-west1".to_string(), "10.0.3.0/24".to_string()),
            ]),
            private_google_access: true,
            flow_logs: false,
        }
    }

    #[test]
    fn test_regions_primary_first() {
        let network = network();
        let regions: Vec<_> = network.regions().collect();
        assert_eq!(regions, vec!["us-central1", "us-east1", "europe-west1"]);
    }

    #[test]
    fn test_subnet_lookup() {
        let net = network();
        assert_eq!(net.subnet_cidr("us-central1"), Some("10.0.1.0/24"));
        assert_eq!(net.subnet_cidr("europe-west1"), Some("10.0.3.0/24"));
        assert_eq!(net.subnet_cidr("asia-east1"), None);
        assert!(net.has_region("us-east1"));
        assert!(!net.has_region("asia-east1"));
    }
}
