//! Shared test utilities and fixtures for the netform test suite.
//!
//! This module provides:
//! - A fluent builder for topologies
//! - Sample topology documents in YAML
//! - Temporary directory helpers
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::path::PathBuf;

use indexmap::IndexMap;
use tempfile::TempDir;

use netform::topology::{
    AllowedTraffic, CloudProvider, ConnectionType, Direction, FirewallRule, Identity,
    MachineProfile, NetworkConfig, ProviderLink, Redundancy, Scaling, TopologyConfig, Workload,
    WorkloadKind,
};

// ============================================================================
// Topology Builder
// ============================================================================

/// Fluent builder for topologies used across integration tests.
pub struct TopologyBuilder {
    config: TopologyConfig,
}

impl TopologyBuilder {
    /// Single-region topology with no optional features.
    pub fn new(application_name: &str) -> Self {
        Self {
            config: TopologyConfig {
                identity: Identity {
                    project_id: "acme-prod".to_string(),
                    application_name: application_name.to_string(),
                },
                network: NetworkConfig {
                    primary_region: "us-central1".to_string(),
                    secondary_regions: vec![],
                    vpc_cidr: "10.0.0.0/16".to_string(),
                    primary_subnet_cidr: "10.0.1.0/24".to_string(),
                    subnet_cidrs: IndexMap::new(),
                    private_google_access: true,
                    flow_logs: false,
                },
                connectivity: Default::default(),
                security: Default::default(),
                workloads: vec![],
            },
        }
    }

    pub fn secondary_region(mut self, region: &str, cidr: &str) -> Self {
        self.config.network.secondary_regions.push(region.to_string());
        self.config
            .network
            .subnet_cidrs
            .insert(region.to_string(), cidr.to_string());
        self
    }

    pub fn flow_logs(mut self) -> Self {
        self.config.network.flow_logs = true;
        self
    }

    pub fn on_prem(mut self, connection_type: ConnectionType, redundancy: Redundancy) -> Self {
        let on_prem = &mut self.config.connectivity.on_prem;
        on_prem.enabled = true;
        on_prem.connection_type = connection_type;
        on_prem.redundancy = redundancy;
        self
    }

    pub fn provider(mut self, provider: CloudProvider) -> Self {
        let multi_cloud = &mut self.config.connectivity.multi_cloud;
        multi_cloud.enabled = true;
        multi_cloud.providers.push(ProviderLink {
            name: provider,
            regions: vec![],
            redundancy: Redundancy::Low,
        });
        self
    }

    pub fn site_to_site(mut self, data_transfer: bool) -> Self {
        self.config.connectivity.site_to_site.enabled = true;
        self.config.connectivity.site_to_site.data_transfer = data_transfer;
        self
    }

    pub fn nat(mut self) -> Self {
        self.config.security.nat = true;
        self
    }

    pub fn armor(mut self) -> Self {
        self.config.security.armor = true;
        self
    }

    pub fn private_service_connect(mut self) -> Self {
        self.config.security.private_service_connect = true;
        self
    }

    pub fn firewall(mut self, name: &str, ports: &[&str]) -> Self {
        self.config.security.firewall_rules.push(FirewallRule {
            name: name.to_string(),
            direction: Direction::Ingress,
            priority: 1000,
            source_ranges: vec!["0.0.0.0/0".to_string()],
            target_tags: vec![],
            allowed: vec![AllowedTraffic {
                protocol: "tcp".to_string(),
                ports: ports.iter().map(|p| p.to_string()).collect(),
            }],
        });
        self
    }

    pub fn workload(mut self, name: &str, kind: WorkloadKind, region: &str) -> Self {
        self.config.workloads.push(Workload {
            name: name.to_string(),
            kind,
            region: region.to_string(),
            scaling: Scaling { min: 1, max: 3 },
            machine: MachineProfile::default(),
        });
        self
    }

    pub fn build(self) -> TopologyConfig {
        self.config
    }
}

/// Every feature switched on, two regions, one workload of each kind.
pub fn full_topology() -> TopologyConfig {
    TopologyBuilder::new("shop")
        .secondary_region("us-east1", "10.0.2.0/24")
        .flow_logs()
        .on_prem(ConnectionType::Vpn, Redundancy::High)
        .provider(CloudProvider::Aws)
        .provider(CloudProvider::Azure)
        .site_to_site(true)
        .nat()
        .armor()
        .private_service_connect()
        .firewall("allow-https", &["443"])
        .workload("web", WorkloadKind::Compute, "us-central1")
        .workload("api", WorkloadKind::Orchestrated, "us-east1")
        .workload("hooks", WorkloadKind::Serverless, "us-central1")
        .build()
}

// ============================================================================
// Documents
// ============================================================================

/// Minimal topology document.
pub const MINIMAL_YAML: &str = r#"identity:
  projectId: acme-prod
  applicationName: shop
network:
  primaryRegion: us-central1
  vpcCidr: 10.0.0.0/16
  primarySubnetCidr: 10.0.1.0/24
  privateGoogleAccess: true
"#;

/// Topology document with connectivity, security and workloads.
pub const FULL_YAML: &str = r#"identity:
  projectId: acme-prod
  applicationName: shop
network:
  primaryRegion: us-central1
  secondaryRegions: [us-east1]
  vpcCidr: 10.0.0.0/16
  primarySubnetCidr: 10.0.1.0/24
  subnetCidrs:
    us-east1: 10.0.2.0/24
  flowLogs: true
connectivity:
  onPrem:
    enabled: true
    type: partner
    redundancy: high
  multiCloud:
    enabled: true
    providers:
      - name: aws
        regions: [us-east-1]
security:
  nat: true
  armor: true
  firewallRules:
    - name: allow-ssh
      sourceRanges: [35.235.240.0/20]
      allowed:
        - protocol: tcp
          ports: ["22"]
workloads:
  - name: web
    kind: compute
    region: us-central1
    scaling: { min: 2, max: 5 }
  - name: api
    kind: gke
    region: us-east1
"#;

/// Writes `content` to `name` inside a fresh temporary directory.
pub fn write_topology(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write topology");
    (dir, path)
}
