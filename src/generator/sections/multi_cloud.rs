//! Network Connectivity Center hub and spoke per external provider.
//!
//! Names use the provider as the index dimension so that reordering the
//! provider list leaves every name unchanged.

use indexmap::IndexMap;
use tracing::debug;

use super::{vpc, SectionContext, SectionGenerator};
use crate::error::Result;
use crate::generator::declaration::{ResourceDeclaration, ResourceKind, Section};
use crate::generator::registry::IdentifierRegistry;
use crate::hcl::{Body, Reference, Template, Value};
use crate::topology::{ProviderLink, TopologyConfig};

/// Reference to the hub reserved for a provider.
pub(crate) fn hub(registry: &mut IdentifierRegistry, provider: &str) -> Result<Reference> {
    let name = registry.reserve("hub", None, Some(provider))?;
    Ok(Reference::new(ResourceKind::ConnectivityHub.as_str(), name))
}

fn labels(link: &ProviderLink) -> Value {
    let mut labels = IndexMap::new();
    labels.insert("environment".to_string(), Value::str("production"));
    labels.insert("provider".to_string(), Value::str(link.name.as_str()));
    labels.insert("redundancy".to_string(), Value::str(link.redundancy.as_str()));
    Value::Map(labels)
}

/// Hubs and spokes. Runs only when multi-cloud is enabled with providers.
pub struct MultiCloudSection;

impl SectionGenerator for MultiCloudSection {
    fn section(&self) -> Section {
        Section::MultiCloud
    }

    fn applies(&self, config: &TopologyConfig) -> bool {
        !config.connectivity.multi_cloud.active_providers().is_empty()
    }

    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>> {
        let vpc_ref = vpc(registry)?;
        let mut out = Vec::new();

        for link in ctx.config.connectivity.multi_cloud.active_providers() {
            let provider = link.name.as_str();
            let label = link.name.label();
            let hub_ref = hub(registry, provider)?;

            out.push(ResourceDeclaration::new(
                Section::MultiCloud,
                ResourceKind::ConnectivityHub,
                hub_ref.name.clone(),
                Body::new()
                    .attr(
                        "name",
                        Template::new()
                            .var("application_name")
                            .lit(format!("-{}-hub", provider)),
                    )
                    .attr("description", format!("Hub for {} connectivity", label))
                    .attr("labels", labels(link)),
            ));

            let spoke = registry.reserve("spoke", None, Some(provider))?;
            out.push(ResourceDeclaration::new(
                Section::MultiCloud,
                ResourceKind::ConnectivitySpoke,
                spoke,
                Body::new()
                    .attr(
                        "name",
                        Template::new()
                            .var("application_name")
                            .lit(format!("-{}-spoke", provider)),
                    )
                    .attr("location", "global")
                    .attr("description", format!("Spoke for {} connectivity", label))
                    .attr("hub", hub_ref.attr("id"))
                    .block(
                        "linked_vpc_network",
                        Body::new().attr("uri", vpc_ref.clone().attr("self_link")),
                    )
                    .attr("labels", labels(link)),
            ));
        }

        debug!(count = out.len(), "Generated multi-cloud connectivity");
        Ok(out)
    }
}
