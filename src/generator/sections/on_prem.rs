//! On-premises connectivity: Cloud VPN or an interconnect attachment, always
//! in the primary region.

use tracing::debug;

use super::{cloud_name, router, vpc, SectionContext, SectionGenerator};
use crate::error::Result;
use crate::generator::declaration::{ResourceDeclaration, ResourceKind, Section};
use crate::generator::registry::IdentifierRegistry;
use crate::hcl::{Body, Value};
use crate::topology::{ConnectionType, OnPremConnectivity, Redundancy, TopologyConfig};

/// Protocol, port and index of the three forwarding rules a classic VPN
/// gateway needs (ESP, IKE, NAT-T).
const VPN_FORWARDING: &[(&str, &str, Option<&str>)] = &[
    ("esp", "ESP", None),
    ("udp500", "UDP", Some("500")),
    ("udp4500", "UDP", Some("4500")),
];

/// On-premises link. Runs only when enabled.
pub struct OnPremSection;

impl SectionGenerator for OnPremSection {
    fn section(&self) -> Section {
        Section::OnPrem
    }

    fn applies(&self, config: &TopologyConfig) -> bool {
        config.connectivity.on_prem.enabled
    }

    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>> {
        let link = &ctx.config.connectivity.on_prem;
        let out = match link.connection_type {
            ConnectionType::Vpn => vpn(registry)?,
            ConnectionType::Dedicated | ConnectionType::Partner => attachment(ctx, link, registry)?,
        };
        debug!(
            count = out.len(),
            connection = link.connection_type.as_str(),
            "Generated on-premises connectivity"
        );
        Ok(out)
    }
}

fn vpn(registry: &mut IdentifierRegistry) -> Result<Vec<ResourceDeclaration>> {
    let vpc_ref = vpc(registry)?;

    let gateway = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::VpnGateway,
        registry.reserve("vpn-gateway", None, None)?,
        Body::new()
            .attr("name", cloud_name("vpn-gateway"))
            .attr("network", vpc_ref.clone().attr("id"))
            .attr("region", Value::var("primary_region")),
    );

    let address = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::Address,
        registry.reserve("vpn-ip", None, None)?,
        Body::new()
            .attr("name", cloud_name("vpn-ip"))
            .attr("region", Value::var("primary_region")),
    );

    let mut rules = Vec::new();
    for (index, protocol, port) in VPN_FORWARDING {
        let rule = ResourceDeclaration::new(
            Section::OnPrem,
            ResourceKind::ForwardingRule,
            registry.reserve("vpn-rule", None, Some(*index))?,
            Body::new()
                .attr("name", cloud_name(&format!("vpn-{}", index)))
                .attr("ip_protocol", *protocol)
                .attr_opt("port_range", *port)
                .attr("ip_address", address.attr("address"))
                .attr("target", gateway.attr("id"))
                .attr("region", Value::var("primary_region")),
        );
        rules.push(rule);
    }

    let tunnel = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::VpnTunnel,
        registry.reserve("vpn-tunnel", None, None)?,
        Body::new()
            .attr("name", cloud_name("vpn-tunnel"))
            .attr("region", Value::var("primary_region"))
            .attr("peer_ip", Value::var("on_prem_gateway_ip"))
            .attr("shared_secret", Value::var("vpn_shared_secret"))
            .attr("target_vpn_gateway", gateway.attr("id"))
            .attr("local_traffic_selector", Value::List(vec![Value::var("vpc_cidr")]))
            .attr("remote_traffic_selector", Value::List(vec![Value::var("on_prem_cidr")])),
    )
    .depends_on(rules.iter().map(ResourceDeclaration::reference));

    let route = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::Route,
        registry.reserve("on-prem-route", None, None)?,
        Body::new()
            .attr("name", cloud_name("on-prem-route"))
            .attr("dest_range", Value::var("on_prem_cidr"))
            .attr("network", vpc_ref.attr("name"))
            .attr("next_hop_vpn_tunnel", tunnel.attr("id"))
            .attr("priority", 1000i64),
    );

    let mut out = vec![gateway, address];
    out.extend(rules);
    out.push(tunnel);
    out.push(route);
    Ok(out)
}

fn attachment(
    ctx: &SectionContext<'_>,
    link: &OnPremConnectivity,
    registry: &mut IdentifierRegistry,
) -> Result<Vec<ResourceDeclaration>> {
    let router_ref = router(registry, &ctx.network().primary_region)?;

    let domain = match link.redundancy {
        Redundancy::High => "AVAILABILITY_DOMAIN_ANY",
        Redundancy::Low => "AVAILABILITY_DOMAIN_1",
    };
    let kind = match link.connection_type {
        ConnectionType::Dedicated => "DEDICATED",
        _ => "PARTNER",
    };

    let mut body = Body::new()
        .attr("name", cloud_name("interconnect"))
        .attr("edge_availability_domain", domain)
        .attr("type", kind)
        .attr("router", router_ref.clone().attr("id"))
        .attr("region", Value::var("primary_region"));
    if link.connection_type == ConnectionType::Partner {
        body.push_attr("admin_enabled", true);
    }
    if link.encryption {
        body.push_attr("encryption", "IPSEC");
    }

    let attachment = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::InterconnectAttachment,
        registry.reserve("interconnect", None, None)?,
        body,
    );

    let interface = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::RouterInterface,
        registry.reserve("router-interface", None, None)?,
        Body::new()
            .attr("name", cloud_name("interface"))
            .attr("router", router_ref.clone().attr("name"))
            .attr("region", Value::var("primary_region"))
            .attr("ip_range", Value::var("interconnect_ip_range"))
            .attr("interconnect_attachment", attachment.attr("self_link")),
    );

    let peer = ResourceDeclaration::new(
        Section::OnPrem,
        ResourceKind::RouterPeer,
        registry.reserve("bgp-peer", None, None)?,
        Body::new()
            .attr("name", cloud_name("bgp-peer"))
            .attr("router", router_ref.attr("name"))
            .attr("region", Value::var("primary_region"))
            .attr("peer_ip_address", Value::var("on_prem_bgp_peer_ip"))
            .attr("peer_asn", Value::var("on_prem_bgp_asn"))
            .attr("advertised_route_priority", 100i64)
            .attr("interface", interface.attr("name")),
    );

    Ok(vec![attachment, interface, peer])
}
