//! Project API enablement.

use tracing::debug;

use super::{SectionContext, SectionGenerator};
use crate::error::Result;
use crate::generator::declaration::{ResourceDeclaration, ResourceKind, Section};
use crate::generator::registry::IdentifierRegistry;
use crate::hcl::{Body, Reference, Value};
use crate::topology::{TopologyConfig, WorkloadKind};

/// Short API names needed by the topology, in a fixed order.
pub fn required_apis(config: &TopologyConfig) -> Vec<&'static str> {
    let mut apis = vec!["compute"];
    if config.has_workload_kind(&WorkloadKind::Orchestrated) {
        apis.push("container");
    }
    if config.has_workload_kind(&WorkloadKind::Serverless) {
        apis.push("run");
    }
    if config.security.private_service_connect {
        apis.push("servicenetworking");
    }
    if !config.connectivity.multi_cloud.active_providers().is_empty() {
        apis.push("networkconnectivity");
    }
    apis.push("dns");
    apis.push("cloudresourcemanager");
    apis
}

/// References to every enabled API, for `depends_on`.
pub(crate) fn api_references(
    config: &TopologyConfig,
    registry: &mut IdentifierRegistry,
) -> Result<Vec<Reference>> {
    required_apis(config)
        .into_iter()
        .map(|api| {
            let name = registry.reserve("api", None, Some(api))?;
            Ok(Reference::new(ResourceKind::ProjectService.as_str(), name))
        })
        .collect()
}

/// One `google_project_service` per required API.
pub struct ServicesSection;

impl SectionGenerator for ServicesSection {
    fn section(&self) -> Section {
        Section::Services
    }

    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>> {
        let mut out = Vec::new();
        for api in required_apis(ctx.config) {
            let name = registry.reserve("api", None, Some(api))?;
            let body = Body::new()
                .attr("project", Value::var("project_id"))
                .attr("service", format!("{}.googleapis.com", api))
                .attr("disable_dependent_services", false)
                .attr("disable_on_destroy", false);
            out.push(ResourceDeclaration::new(
                Section::Services,
                ResourceKind::ProjectService,
                name,
                body,
            ));
        }
        debug!(count = out.len(), "Generated API enablement");
        Ok(out)
    }
}
