//! Security section: feature flags and ordered firewall rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Security flags and firewall rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityConfig {
    /// Cloud Armor edge security policy.
    #[serde(alias = "enableCloudArmor")]
    pub armor: bool,

    /// Cloud NAT on every regional router.
    #[serde(alias = "enableCloudNAT", alias = "enableCloudNat")]
    pub nat: bool,

    /// Private Service Connect endpoint for Google APIs.
    #[serde(alias = "enablePrivateServiceConnect")]
    pub private_service_connect: bool,

    /// Firewall rules, emitted in input order.
    pub firewall_rules: Vec<FirewallRule>,
}

/// Traffic direction of a firewall rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    #[serde(alias = "ingress")]
    Ingress,
    #[serde(alias = "egress")]
    Egress,
}

impl Direction {
    /// Value expected by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ingress => "INGRESS",
            Direction::Egress => "EGRESS",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One allowed protocol with optional ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedTraffic {
    pub protocol: String,
    #[serde(default)]
    pub ports: Vec<String>,
}

/// A firewall rule descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallRule {
    pub name: String,

    #[serde(default)]
    pub direction: Direction,

    #[serde(default = "default_priority")]
    pub priority: u32,

    /// Source ranges for ingress rules; destination ranges for egress rules.
    #[serde(default)]
    pub source_ranges: Vec<String>,

    #[serde(default)]
    pub target_tags: Vec<String>,

    #[serde(default)]
    pub allowed: Vec<AllowedTraffic>,
}

fn default_priority() -> u32 {
    1000
}

/// Highest priority number the provider accepts for firewall rules.
pub const MAX_FIREWALL_PRIORITY: u32 = 65535;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule: FirewallRule = serde_yaml::from_str("name: allow-ssh").unwrap();
        assert_eq!(rule.priority, 1000);
        assert_eq!(rule.direction, Direction::Ingress);
        assert!(rule.allowed.is_empty());
    }

    #[test]
    fn test_legacy_flag_names() {
        let sec: SecurityConfig =
            serde_json::from_str(r#"{"enableCloudArmor": true, "enableCloudNAT": true}"#).unwrap();
        assert!(sec.armor);
        assert!(sec.nat);
        assert!(!sec.private_service_connect);
    }

    #[test]
    fn test_direction_parsing() {
        let d: Direction = serde_json::from_str("\"egress\"").unwrap();
        assert_eq!(d, Direction::Egress);
        assert_eq!(d.to_string(), "EGRESS");
    }
}
