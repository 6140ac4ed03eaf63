//! Variable extraction.
//!
//! Flattens a topology into the ordered table of input variables the main
//! text reads through `var.<name>`. The count of variables does not grow
//! with the number of regions: secondary subnets share one map variable.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::hcl::Value;
use crate::topology::{ConnectionType, TopologyConfig, WorkloadKind};

/// Startup script installed on compute instances unless overridden.
pub const DEFAULT_STARTUP_SCRIPT: &str =
    "#!/bin/bash\napt-get update\napt-get install -y nginx\nsystemctl start nginx\nsystemctl enable nginx";

/// Inferred type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Bool,
    Map,
}

impl VariableType {
    /// Type constraint as written in a variable block.
    pub fn constraint(&self) -> &'static str {
        match self {
            VariableType::String => "string",
            VariableType::Number => "number",
            VariableType::Bool => "bool",
            VariableType::Map => "map(string)",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint())
    }
}

/// Default value of a variable. The variant determines the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VariableValue {
    String(String),
    Number(i64),
    Bool(bool),
    Map(IndexMap<String, String>),
}

impl VariableValue {
    pub fn var_type(&self) -> VariableType {
        match self {
            VariableValue::String(_) => VariableType::String,
            VariableValue::Number(_) => VariableType::Number,
            VariableValue::Bool(_) => VariableType::Bool,
            VariableValue::Map(_) => VariableType::Map,
        }
    }

    /// Typed HCL value, as used for `default` in a declaration.
    pub fn to_value(&self) -> Value {
        match self {
            VariableValue::String(s) => Value::String(s.clone()),
            VariableValue::Number(n) => Value::Number(*n),
            VariableValue::Bool(b) => Value::Bool(*b),
            VariableValue::Map(map) => Value::string_map(map.iter().map(|(k, v)| (k.clone(), v.clone()))),
        }
    }

    /// Scalars as quoted literals, maps nested, as written in a defaults file.
    pub fn to_literal(&self) -> Value {
        match self {
            VariableValue::String(s) => Value::String(s.clone()),
            VariableValue::Number(n) => Value::String(n.to_string()),
            VariableValue::Bool(b) => Value::String(b.to_string()),
            VariableValue::Map(_) => self.to_value(),
        }
    }
}

/// One input variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
    pub name: String,
    pub description: String,
    pub default: VariableValue,
    /// Hidden from plan output
    pub sensitive: bool,
    /// Default is a stand-in the operator must replace
    pub placeholder: bool,
}

impl Variable {
    fn new(name: &str, description: &str, default: VariableValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            default,
            sensitive: false,
            placeholder: false,
        }
    }

    fn string(name: &str, description: &str, default: impl Into<String>) -> Self {
        Self::new(name, description, VariableValue::String(default.into()))
    }

    fn flag(name: &str, description: &str, default: bool) -> Self {
        Self::new(name, description, VariableValue::Bool(default))
    }

    fn placeholder(mut self) -> Self {
        self.placeholder = true;
        self
    }

    fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn var_type(&self) -> VariableType {
        self.default.var_type()
    }
}

/// Extract the variable table for a topology.
pub fn extract_variables(config: &TopologyConfig) -> Vec<Variable> {
    let net = &config.network;
    let security = &config.security;

    let secondary: IndexMap<String, String> = net
        .secondary_regions
        .iter()
        .filter_map(|region| {
            net.subnet_cidrs
                .get(region)
                .map(|cidr| (region.clone(), cidr.clone()))
        })
        .collect();

    let mut vars = vec![
        Variable::string("project_id", "Google Cloud project ID", &config.identity.project_id),
        Variable::string(
            "application_name",
            "Name of the application, used as a prefix for every resource",
            &config.identity.application_name,
        ),
        Variable::string("primary_region", "Primary Google Cloud region", &net.primary_region),
        Variable::string("vpc_cidr", "CIDR block for the VPC network", &net.vpc_cidr),
        Variable::string(
            "primary_subnet_cidr",
            "CIDR block for the primary subnet",
            &net.primary_subnet_cidr,
        ),
        Variable::new(
            "secondary_subnet_cidrs",
            "CIDR blocks for secondary subnets, keyed by region",
            VariableValue::Map(secondary),
        ),
        Variable::flag(
            "enable_private_google_access",
            "Enable private Google access for subnets",
            net.private_google_access,
        ),
        Variable::flag("enable_flow_logs", "Enable VPC flow logs", net.flow_logs),
        Variable::flag(
            "enable_cloud_armor",
            "Enable Cloud Armor security policies",
            security.armor,
        ),
        Variable::flag(
            "enable_cloud_nat",
            "Enable Cloud NAT for outbound internet access",
            security.nat,
        ),
        Variable::flag(
            "enable_private_service_connect",
            "Enable a Private Service Connect endpoint for Google APIs",
            security.private_service_connect,
        ),
    ];

    if config.has_workload_kind(&WorkloadKind::Compute) {
        vars.push(Variable::string(
            "startup_script",
            "Startup script for Compute Engine instances",
            DEFAULT_STARTUP_SCRIPT,
        ));
    }

    if security.private_service_connect {
        vars.push(
            Variable::string(
                "psc_endpoint_ip",
                "Internal IP address of the Private Service Connect endpoint",
                "10.255.255.254",
            )
            .placeholder(),
        );
    }

    let on_prem = &config.connectivity.on_prem;
    if on_prem.enabled {
        match on_prem.connection_type {
            ConnectionType::Vpn => {
                vars.push(
                    Variable::string(
                        "on_prem_gateway_ip",
                        "IP address of the on-premises VPN gateway",
                        "203.0.113.1",
                    )
                    .placeholder(),
                );
                vars.push(
                    Variable::string(
                        "vpn_shared_secret",
                        "Shared secret for the VPN tunnel",
                        "your-shared-secret",
                    )
                    .placeholder()
                    .sensitive(),
                );
                vars.push(
                    Variable::string(
                        "on_prem_cidr",
                        "CIDR block of the on-premises network",
                        "192.168.0.0/16",
                    )
                    .placeholder(),
                );
            }
            ConnectionType::Dedicated | ConnectionType::Partner => {
                vars.push(
                    Variable::string(
                        "on_prem_bgp_peer_ip",
                        "BGP peer IP address on the on-premises side",
                        "169.254.1.1",
                    )
                    .placeholder(),
                );
                vars.push(
                    Variable::new(
                        "on_prem_bgp_asn",
                        "BGP ASN of the on-premises network",
                        VariableValue::Number(65001),
                    )
                    .placeholder(),
                );
                vars.push(
                    Variable::string(
                        "interconnect_ip_range",
                        "Link-local IP range for the interconnect router interface",
                        "169.254.1.0/30",
                    )
                    .placeholder(),
                );
            }
        }
    }

    vars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::sections::fixtures;

    fn names(vars: &[Variable]) -> Vec<&str> {
        vars.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_base_variables() {
        let vars = extract_variables(&fixtures::shop());
        assert_eq!(
            names(&vars),
            vec![
                "project_id",
                "application_name",
                "primary_region",
                "vpc_cidr",
                "primary_subnet_cidr",
                "secondary_subnet_cidrs",
                "enable_private_google_access",
                "enable_flow_logs",
                "enable_cloud_armor",
                "enable_cloud_nat",
                "enable_private_service_connect",
            ]
        );
        assert_eq!(vars[5].var_type(), VariableType::Map);
        assert_eq!(vars[6].var_type(), VariableType::Bool);
        assert_eq!(vars[6].default, VariableValue::Bool(true));
    }

    #[test]
    fn test_secondary_cidrs_share_one_variable() {
        let config = fixtures::with_secondary(
            fixtures::with_secondary(fixtures::shop(), "us-east1", "10.0.2.0/24"),
            "europe-west1",
            "10.0.3.0/24",
        );
        let vars = extract_variables(&config);
        assert_eq!(vars.len(), 11);

        let VariableValue::Map(map) = &vars[5].default else {
            panic!("expected map default");
        };
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["us-east1", "europe-west1"]);
    }

    #[test]
    fn test_vpn_variables() {
        let mut config = fixtures::shop();
        config.connectivity.on_prem.enabled = true;
        let vars = extract_variables(&config);

        let secret = vars.iter().find(|v| v.name == "vpn_shared_secret").unwrap();
        assert!(secret.sensitive);
        assert!(secret.placeholder);
        assert!(vars.iter().any(|v| v.name == "on_prem_cidr"));
        assert!(!vars.iter().any(|v| v.name == "on_prem_bgp_asn"));
    }

    #[test]
    fn test_attachment_variables() {
        let mut config = fixtures::shop();
        config.connectivity.on_prem.enabled = true;
        config.connectivity.on_prem.connection_type = ConnectionType::Dedicated;
        let vars = extract_variables(&config);

        let asn = vars.iter().find(|v| v.name == "on_prem_bgp_asn").unwrap();
        assert_eq!(asn.var_type(), VariableType::Number);
        assert_eq!(asn.default.to_literal(), Value::str("65001"));
        assert!(!vars.iter().any(|v| v.name == "vpn_shared_secret"));
    }

    #[test]
    fn test_startup_script_only_for_compute() {
        let mut config = fixtures::shop();
        assert!(!extract_variables(&config).iter().any(|v| v.name == "startup_script"));
        config
            .workloads
            .push(fixtures::workload("web", WorkloadKind::Compute, "us-central1"));
        assert!(extract_variables(&config).iter().any(|v| v.name == "startup_script"));
    }
}
