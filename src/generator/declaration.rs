//! Resource declarations: the typed intermediate form between section
//! generators and rendered text.

use serde::Serialize;
use std::fmt;

use crate::hcl::{Block, Body, Reference, Value};

/// Every resource type the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    ProjectService,
    Network,
    Subnetwork,
    Router,
    RouterNat,
    VpnGateway,
    Address,
    ForwardingRule,
    VpnTunnel,
    Route,
    InterconnectAttachment,
    RouterInterface,
    RouterPeer,
    ConnectivityHub,
    ConnectivitySpoke,
    Firewall,
    SecurityPolicy,
    GlobalAddress,
    GlobalForwardingRule,
    InstanceTemplate,
    HealthCheck,
    InstanceGroupManager,
    Autoscaler,
    ContainerCluster,
    ContainerNodePool,
    CloudRunService,
    CloudRunInvoker,
}

impl ResourceKind {
    /// Provider resource type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::ProjectService => "google_project_service",
            ResourceKind::Network => "google_compute_network",
            ResourceKind::Subnetwork => "google_compute_subnetwork",
            ResourceKind::Router => "google_compute_router",
            ResourceKind::RouterNat => "google_compute_router_nat",
            ResourceKind::VpnGateway => "google_compute_vpn_gateway",
            ResourceKind::Address => "google_compute_address",
            ResourceKind::ForwardingRule => "google_compute_forwarding_rule",
            ResourceKind::VpnTunnel => "google_compute_vpn_tunnel",
            ResourceKind::Route => "google_compute_route",
            ResourceKind::InterconnectAttachment => "google_compute_interconnect_attachment",
            ResourceKind::RouterInterface => "google_compute_router_interface",
            ResourceKind::RouterPeer => "google_compute_router_peer",
            ResourceKind::ConnectivityHub => "google_network_connectivity_hub",
            ResourceKind::ConnectivitySpoke => "google_network_connectivity_spoke",
            ResourceKind::Firewall => "google_compute_firewall",
            ResourceKind::SecurityPolicy => "google_compute_security_policy",
            ResourceKind::GlobalAddress => "google_compute_global_address",
            ResourceKind::GlobalForwardingRule => "google_compute_global_forwarding_rule",
            ResourceKind::InstanceTemplate => "google_compute_instance_template",
            ResourceKind::HealthCheck => "google_compute_health_check",
            ResourceKind::InstanceGroupManager => "google_compute_region_instance_group_manager",
            ResourceKind::Autoscaler => "google_compute_region_autoscaler",
            ResourceKind::ContainerCluster => "google_container_cluster",
            ResourceKind::ContainerNodePool => "google_container_node_pool",
            ResourceKind::CloudRunService => "google_cloud_run_service",
            ResourceKind::CloudRunInvoker => "google_cloud_run_service_iam_member",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Section a declaration belongs to. Sections render in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Section {
    Services,
    Network,
    OnPrem,
    MultiCloud,
    Security,
    Workloads,
}

impl Section {
    /// Heading written above the section in the main text.
    pub fn title(&self) -> &'static str {
        match self {
            Section::Services => "Required APIs",
            Section::Network => "Network Infrastructure",
            Section::OnPrem => "On-Premises Connectivity",
            Section::MultiCloud => "Multi-Cloud Connectivity",
            Section::Security => "Security Resources",
            Section::Workloads => "Application Workloads",
        }
    }
}

/// One generated resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDeclaration {
    pub kind: ResourceKind,
    pub name: String,
    pub section: Section,
    pub body: Body,
    pub depends_on: Vec<Reference>,
}

impl ResourceDeclaration {
    pub fn new(section: Section, kind: ResourceKind, name: impl Into<String>, body: Body) -> Self {
        Self {
            kind,
            name: name.into(),
            section,
            body,
            depends_on: Vec::new(),
        }
    }

    /// Add explicit dependencies, rendered as a trailing `depends_on` list.
    pub fn depends_on(mut self, targets: impl IntoIterator<Item = Reference>) -> Self {
        self.depends_on.extend(targets);
        self
    }

    /// `<kind>.<name>`
    pub fn address(&self) -> String {
        format!("{}.{}", self.kind.as_str(), self.name)
    }

    /// Reference to this declaration as a whole.
    pub fn reference(&self) -> Reference {
        Reference::new(self.kind.as_str(), self.name.clone())
    }

    /// Reference to one attribute of this declaration.
    pub fn attr(&self, attr: &str) -> Reference {
        self.reference().attr(attr)
    }

    /// Every reference made by this declaration, body first, then `depends_on`.
    pub fn references(&self) -> Vec<&Reference> {
        let mut refs = self.body.references();
        refs.extend(self.depends_on.iter());
        refs
    }

    /// Render-ready `resource` block.
    pub fn to_block(&self) -> Block {
        let mut body = self.body.clone();
        if !self.depends_on.is_empty() {
            body.push_attr(
                "depends_on",
                Value::List(self.depends_on.iter().cloned().map(Value::Reference).collect()),
            );
        }
        Block::labeled("resource", [self.kind.as_str(), self.name.as_str()], body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hcl::render_block;

    #[test]
    fn test_address_and_references() {
        let vpc = ResourceDeclaration::new(Section::Network, ResourceKind::Network, "shop-vpc", Body::new());
        let api = Reference::new("google_project_service", "shop-api-compute");
        let subnet = ResourceDeclaration::new(
            Section::Network,
            ResourceKind::Subnetwork,
            "shop-subnet-us-central1",
            Body::new().attr("network", vpc.attr("id")),
        )
        .depends_on([api.clone()]);

        assert_eq!(vpc.address(), "google_compute_network.shop-vpc");
        let refs = subnet.references();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].address(), "google_compute_network.shop-vpc");
        assert_eq!(refs[1], &api);
    }

    #[test]
    fn test_depends_on_rendered_last() {
        let decl = ResourceDeclaration::new(
            Section::Network,
            ResourceKind::Network,
            "shop-vpc",
            Body::new().attr("mtu", 1460i64),
        )
        .depends_on([Reference::new("google_project_service", "shop-api-compute")]);

        let text = render_block(&decl.to_block());
        assert!(text.starts_with("resource \"google_compute_network\" \"shop-vpc\" {\n"));
        assert!(text.contains(
            "depends_on = [google_project_service.shop-api-compute]\n}"
        ));
    }

    #[test]
    fn test_sections_are_ordered() {
        assert!(Section::Services < Section::Network);
        assert!(Section::Security < Section::Workloads);
        assert_eq!(Section::OnPrem.title(), "On-Premises Connectivity");
    }
}
