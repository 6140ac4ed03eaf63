//! Firewall rules, Cloud Armor and Private Service Connect.

use tracing::debug;

use super::{cloud_name, vpc, SectionContext, SectionGenerator};
use crate::error::Result;
use crate::generator::declaration::{ResourceDeclaration, ResourceKind, Section};
use crate::generator::registry::IdentifierRegistry;
use crate::hcl::{Body, Value};
use crate::topology::{Direction, FirewallRule};

/// Priority of the default allow rule in the edge policy.
pub const ARMOR_ALLOW_PRIORITY: i64 = 1000;

/// Priority of the default deny rule: the largest signed 32-bit value, so it
/// is always evaluated last.
pub const ARMOR_DENY_PRIORITY: i64 = i32::MAX as i64;

/// Longest name accepted for the API forwarding rule.
const PSC_NAME_MAX: usize = 20;

/// Security resources. Always runs; every part is optional.
pub struct SecuritySection;

impl SectionGenerator for SecuritySection {
    fn section(&self) -> Section {
        Section::Security
    }

    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>> {
        let security = &ctx.config.security;
        let mut out = Vec::new();

        for rule in &security.firewall_rules {
            out.push(firewall(rule, registry)?);
        }

        if security.armor {
            out.push(armor_policy(registry)?);
        }

        if security.private_service_connect {
            out.extend(private_service_connect(ctx.config.application_name(), registry)?);
        }

        debug!(
            count = out.len(),
            firewall_rules = security.firewall_rules.len(),
            "Generated security section"
        );
        Ok(out)
    }
}

fn firewall(rule: &FirewallRule, registry: &mut IdentifierRegistry) -> Result<ResourceDeclaration> {
    let vpc_ref = vpc(registry)?;
    let name = registry.reserve("firewall", None, Some(&rule.name))?;

    let ranges_key = match rule.direction {
        Direction::Ingress => "source_ranges",
        Direction::Egress => "destination_ranges",
    };

    let mut body = Body::new()
        .attr("name", cloud_name(&rule.name))
        .attr("network", vpc_ref.attr("name"))
        .attr("direction", rule.direction.as_str())
        .attr("priority", i64::from(rule.priority));
    if !rule.source_ranges.is_empty() {
        body.push_attr(ranges_key, Value::strings(rule.source_ranges.iter().cloned()));
    }
    if !rule.target_tags.is_empty() {
        body.push_attr("target_tags", Value::strings(rule.target_tags.iter().cloned()));
    }
    for allowed in &rule.allowed {
        let mut allow = Body::new().attr("protocol", allowed.protocol.as_str());
        if !allowed.ports.is_empty() {
            allow.push_attr("ports", Value::strings(allowed.ports.iter().cloned()));
        }
        body = body.block("allow", allow);
    }

    Ok(ResourceDeclaration::new(Section::Security, ResourceKind::Firewall, name, body))
}

fn armor_rule(action: &str, priority: i64, description: &str) -> Body {
    Body::new()
        .attr("action", action)
        .attr("priority", priority)
        .block(
            "match",
            Body::new()
                .attr("versioned_expr", "SRC_IPS_V1")
                .block("config", Body::new().attr("src_ip_ranges", Value::strings(["*"]))),
        )
        .attr("description", description)
}

fn armor_policy(registry: &mut IdentifierRegistry) -> Result<ResourceDeclaration> {
    let name = registry.reserve("security-policy", None, None)?;
    Ok(ResourceDeclaration::new(
        Section::Security,
        ResourceKind::SecurityPolicy,
        name,
        Body::new()
            .attr("name", cloud_name("security-policy"))
            .attr("description", "Edge security policy")
            .block("rule", armor_rule("allow", ARMOR_ALLOW_PRIORITY, "Default allow rule"))
            .block("rule", armor_rule("deny(403)", ARMOR_DENY_PRIORITY, "Default deny rule"))
            .block(
                "adaptive_protection_config",
                Body::new().block(
                    "layer_7_ddos_defense_config",
                    Body::new().attr("enable", true),
                ),
            ),
    ))
}

/// Forwarding rule names for API bundles must be 1-20 lowercase letters or
/// digits starting with a letter.
pub fn psc_endpoint_name(application_name: &str) -> String {
    let mut name = String::from("psc");
    name.extend(application_name.chars().filter(|c| c.is_ascii_alphanumeric()));
    name.truncate(PSC_NAME_MAX);
    name
}

fn private_service_connect(
    application_name: &str,
    registry: &mut IdentifierRegistry,
) -> Result<Vec<ResourceDeclaration>> {
    let vpc_ref = vpc(registry)?;

    let address = ResourceDeclaration::new(
        Section::Security,
        ResourceKind::GlobalAddress,
        registry.reserve("psc-address", None, None)?,
        Body::new()
            .attr("name", cloud_name("psc-address"))
            .attr("purpose", "PRIVATE_SERVICE_CONNECT")
            .attr("address_type", "INTERNAL")
            .attr("address", Value::var("psc_endpoint_ip"))
            .attr("network", vpc_ref.clone().attr("id")),
    );

    let endpoint = ResourceDeclaration::new(
        Section::Security,
        ResourceKind::GlobalForwardingRule,
        registry.reserve("psc-endpoint", None, None)?,
        Body::new()
            .attr("name", psc_endpoint_name(application_name))
            .attr("target", "all-apis")
            .attr("network", vpc_ref.attr("id"))
            .attr("ip_address", address.attr("id"))
            .attr("load_balancing_scheme", ""),
    );

    Ok(vec![address, endpoint])
}
