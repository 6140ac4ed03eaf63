//! VPC, one subnet and router per region, optional NAT per router.

use tracing::debug;

use super::services::api_references;
use super::{cloud_name, region_value, regional_cloud_name, router, subnet, vpc};
use super::{SectionContext, SectionGenerator};
use crate::error::{Error, Result};
use crate::generator::declaration::{ResourceDeclaration, ResourceKind, Section};
use crate::generator::registry::IdentifierRegistry;
use crate::hcl::{Body, Value};

/// Network infrastructure. Always runs.
pub struct NetworkSection;

impl SectionGenerator for NetworkSection {
    fn section(&self) -> Section {
        Section::Network
    }

    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>> {
        let net = ctx.network();
        let mut out = Vec::new();

        let vpc_ref = vpc(registry)?;
        let routing_mode = if net.secondary_regions.is_empty() {
            "REGIONAL"
        } else {
            "GLOBAL"
        };
        out.push(
            ResourceDeclaration::new(
                Section::Network,
                ResourceKind::Network,
                vpc_ref.name.clone(),
                Body::new()
                    .attr("name", cloud_name("vpc"))
                    .attr("auto_create_subnetworks", false)
                    .attr("mtu", 1460i64)
                    .attr("routing_mode", routing_mode),
            )
            .depends_on(api_references(ctx.config, registry)?),
        );

        for region in net.regions() {
            let cidr = if net.is_primary(region) {
                Value::var("primary_subnet_cidr")
            } else if net.subnet_cidrs.contains_key(region) {
                Value::VariableKey("secondary_subnet_cidrs".to_string(), region.to_string())
            } else {
                return Err(Error::configuration(
                    format!("network.subnetCidrs.{}", region),
                    "missing subnet CIDR for secondary region",
                ));
            };

            let mut body = Body::new()
                .attr("name", regional_cloud_name(net, "subnet", region))
                .attr("ip_cidr_range", cidr)
                .attr("region", region_value(net, region))
                .attr("network", vpc_ref.clone().attr("id"))
                .attr("private_ip_google_access", Value::var("enable_private_google_access"));
            if net.flow_logs {
                body = body.block(
                    "log_config",
                    Body::new()
                        .attr("aggregation_interval", "INTERVAL_10_MIN")
                        .attr("flow_sampling", 0.5)
                        .attr("metadata", "INCLUDE_ALL_METADATA"),
                );
            }

            let name = subnet(registry, region)?.name;
            out.push(ResourceDeclaration::new(
                Section::Network,
                ResourceKind::Subnetwork,
                name,
                body,
            ));
        }

        for region in net.regions() {
            let name = router(registry, region)?.name;
            out.push(ResourceDeclaration::new(
                Section::Network,
                ResourceKind::Router,
                name,
                Body::new()
                    .attr("name", regional_cloud_name(net, "router", region))
                    .attr("region", region_value(net, region))
                    .attr("network", vpc_ref.clone().attr("id"))
                    .block(
                        "bgp",
                        Body::new().attr("asn", i64::from(ctx.options.router_asn)),
                    ),
            ));
        }

        if ctx.config.security.nat {
            for region in net.regions() {
                let router_ref = router(registry, region)?;
                let name = registry.reserve("nat", Some(region), None)?;
                out.push(ResourceDeclaration::new(
                    Section::Network,
                    ResourceKind::RouterNat,
                    name,
                    Body::new()
                        .attr("name", regional_cloud_name(net, "nat", region))
                        .attr("router", router_ref.attr("name"))
                        .attr("region", region_value(net, region))
                        .attr("nat_ip_allocate_option", "AUTO_ONLY")
                        .attr(
                            "source_subnetwork_ip_ranges_to_nat",
                            "ALL_SUBNETWORKS_ALL_IP_RANGES",
                        )
                        .block(
                            "log_config",
                            Body::new().attr("enable", true).attr("filter", "ERRORS_ONLY"),
                        ),
                ));
            }
        }

        debug!(count = out.len(), regions = net.regions().count(), "Generated network section");
        Ok(out)
    }
}
