//! Fail-fast validation of a topology.
//!
//! Runs before any declaration is produced; the first problem found is
//! returned so nothing is ever generated from a partially valid input.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::cidr::{check_source_range, Ipv4Cidr};
use super::security::MAX_FIREWALL_PRIORITY;
use super::workload::WorkloadKind;
use super::TopologyConfig;
use crate::error::{Error, Result};

/// Lowercase letters, digits and hyphens; starts with a letter, no trailing hyphen.
static NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]([a-z0-9-]*[a-z0-9])?$").expect("Invalid name regex")
});

/// Google Cloud region names, e.g. `us-central1`, `europe-west4`.
static REGION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+(-[a-z]+)*[0-9]+$").expect("Invalid region regex"));

/// Whether a string is safe to use as a naming component.
pub fn is_naming_safe(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

fn check_name(path: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::configuration(path, "must not be empty"));
    }
    if !is_naming_safe(name) {
        return Err(Error::configuration(
            path,
            format!(
                "'{}' must contain only lowercase letters, digits and hyphens, start with a letter and not end with a hyphen",
                name
            ),
        ));
    }
    Ok(())
}

fn check_region(path: &str, region: &str) -> Result<()> {
    if !REGION_REGEX.is_match(region) {
        return Err(Error::configuration(
            path,
            format!("'{}' is not a valid region name", region),
        ));
    }
    Ok(())
}

fn check_cidr(path: &str, cidr: &str) -> Result<Ipv4Cidr> {
    cidr.parse::<Ipv4Cidr>()
        .map_err(|message| Error::configuration(path, message))
}

impl TopologyConfig {
    /// Validate the whole topology, returning the first violation.
    pub fn validate(&self) -> Result<()> {
        self.validate_identity()?;
        self.validate_network()?;
        self.validate_connectivity()?;
        self.validate_security()?;
        self.validate_workloads()?;
        Ok(())
    }

    fn validate_identity(&self) -> Result<()> {
        if self.identity.project_id.trim().is_empty() {
            return Err(Error::configuration(
                "identity.projectId",
                "must not be empty",
            ));
        }
        check_name(
            "identity.applicationName",
            &self.identity.application_name,
        )
    }

    fn validate_network(&self) -> Result<()> {
        let net = &self.network;

        check_region("network.primaryRegion", &net.primary_region)?;
        let vpc = check_cidr("network.vpcCidr", &net.vpc_cidr)?;
        let primary = check_cidr("network.primarySubnetCidr", &net.primary_subnet_cidr)?;
        if !vpc.contains(&primary) {
            return Err(Error::configuration(
                "network.primarySubnetCidr",
                format!("'{}' is outside the VPC range '{}'", primary, vpc),
            ));
        }

        let mut seen = HashSet::new();
        for (i, region) in net.secondary_regions.iter().enumerate() {
            let path = format!("network.secondaryRegions[{}]", i);
            check_region(&path, region)?;
            if net.is_primary(region) {
                return Err(Error::configuration(
                    path,
                    format!("'{}' is already the primary region", region),
                ));
            }
            if !seen.insert(region.as_str()) {
                return Err(Error::configuration(
                    path,
                    format!("region '{}' is listed twice", region),
                ));
            }
            if !net.subnet_cidrs.contains_key(region) {
                return Err(Error::configuration(
                    format!("network.subnetCidrs.{}", region),
                    "missing subnet CIDR for secondary region",
                ));
            }
        }

        let mut subnets = vec![primary];
        for (region, cidr) in &net.subnet_cidrs {
            let path = format!("network.subnetCidrs.{}", region);
            if !net.secondary_regions.contains(region) {
                return Err(Error::unresolved_region(path, region.clone()));
            }
            let subnet = check_cidr(&path, cidr)?;
            if let Some(clash) = subnets.iter().find(|s| s.overlaps(&subnet)) {
                return Err(Error::configuration(
                    path,
                    format!("'{}' overlaps subnet '{}'", subnet, clash),
                ));
            }
            subnets.push(subnet);
        }

        Ok(())
    }

    fn validate_connectivity(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, provider) in self.connectivity.multi_cloud.providers.iter().enumerate() {
            if !seen.insert(provider.name) {
                return Err(Error::configuration(
                    format!("connectivity.multiCloud.providers[{}].name", i),
                    format!("provider '{}' is listed twice", provider.name),
                ));
            }
        }
        Ok(())
    }

    fn validate_security(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, rule) in self.security.firewall_rules.iter().enumerate() {
            let base = format!("security.firewallRules[{}]", i);
            check_name(&format!("{}.name", base), &rule.name)?;
            if !seen.insert(rule.name.as_str()) {
                return Err(Error::configuration(
                    format!("{}.name", base),
                    format!("firewall rule '{}' is defined twice", rule.name),
                ));
            }
            if rule.priority > MAX_FIREWALL_PRIORITY {
                return Err(Error::configuration(
                    format!("{}.priority", base),
                    format!("{} exceeds {}", rule.priority, MAX_FIREWALL_PRIORITY),
                ));
            }
            for (j, range) in rule.source_ranges.iter().enumerate() {
                check_source_range(range).map_err(|message| {
                    Error::configuration(format!("{}.sourceRanges[{}]", base, j), message)
                })?;
            }
            for (j, allowed) in rule.allowed.iter().enumerate() {
                if allowed.protocol.trim().is_empty() {
                    return Err(Error::configuration(
                        format!("{}.allowed[{}].protocol", base, j),
                        "must not be empty",
                    ));
                }
            }
        }
        Ok(())
    }

    fn validate_workloads(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, workload) in self.workloads.iter().enumerate() {
            check_name(&format!("workloads[{}].name", i), &workload.name)?;
            if !seen.insert(workload.name.as_str()) {
                return Err(Error::configuration(
                    format!("workloads[{}].name", i),
                    format!("workload '{}' is defined twice", workload.name),
                ));
            }
            if let WorkloadKind::Unsupported(kind) = &workload.kind {
                return Err(Error::UnsupportedWorkloadKind {
                    workload: workload.name.clone(),
                    kind: kind.clone(),
                });
            }
            if !self.network.has_region(&workload.region) {
                return Err(Error::unresolved_region(
                    format!("workloads[{}].region", workload.name),
                    workload.region.clone(),
                ));
            }
            let scaling = workload.scaling;
            if scaling.max == 0 || scaling.min > scaling.max {
                return Err(Error::configuration(
                    format!("workloads[{}].scaling", workload.name),
                    format!(
                        "bounds min={} max={} must satisfy min <= max and max >= 1",
                        scaling.min, scaling.max
                    ),
                ));
            }
            if workload.machine.disk_size_gb == Some(0) {
                return Err(Error::configuration(
                    format!("workloads[{}].machine.diskSizeGb", workload.name),
                    "must be greater than zero",
                ));
            }
        }
        Ok(())
    }
}
