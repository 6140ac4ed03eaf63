//! Section generators.
//!
//! Each section turns one slice of the topology into an ordered list of
//! declarations. Sections run in a fixed order because later sections
//! reference names reserved by earlier ones; they re-derive those names from
//! the registry, which returns the same name for the same key.

pub mod multi_cloud;
pub mod network;
pub mod on_prem;
pub mod security;
pub mod services;
pub mod workloads;

use super::declaration::{ResourceDeclaration, ResourceKind, Section};
use super::options::GeneratorOptions;
use super::registry::IdentifierRegistry;
use crate::error::Result;
use crate::hcl::{Reference, Template, Value};
use crate::topology::{NetworkConfig, TopologyConfig};

pub use multi_cloud::MultiCloudSection;
pub use network::NetworkSection;
pub use on_prem::OnPremSection;
pub use security::SecuritySection;
pub use services::ServicesSection;
pub use workloads::WorkloadsSection;

/// Read-only inputs shared by all sections.
#[derive(Debug, Clone, Copy)]
pub struct SectionContext<'a> {
    pub config: &'a TopologyConfig,
    pub options: &'a GeneratorOptions,
}

impl<'a> SectionContext<'a> {
    pub fn new(config: &'a TopologyConfig, options: &'a GeneratorOptions) -> Self {
        Self { config, options }
    }

    pub fn network(&self) -> &'a NetworkConfig {
        &self.config.network
    }
}

/// A composable generator for one section of the main text.
pub trait SectionGenerator: Send + Sync {
    /// Section the declarations belong to.
    fn section(&self) -> Section;

    /// Whether the section produces anything for this topology.
    fn applies(&self, _config: &TopologyConfig) -> bool {
        true
    }

    /// Produce the section's declarations.
    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>>;
}

/// All sections in generation order.
pub fn all() -> Vec<Box<dyn SectionGenerator>> {
    vec![
        Box::new(ServicesSection),
        Box::new(NetworkSection),
        Box::new(OnPremSection),
        Box::new(MultiCloudSection),
        Box::new(SecuritySection),
        Box::new(WorkloadsSection),
    ]
}

// ============================================================================
// Shared names and values
// ============================================================================

pub(crate) fn vpc(registry: &mut IdentifierRegistry) -> Result<Reference> {
    let name = registry.reserve("vpc", None, None)?;
    Ok(Reference::new(ResourceKind::Network.as_str(), name))
}

pub(crate) fn subnet(registry: &mut IdentifierRegistry, region: &str) -> Result<Reference> {
    let name = registry.reserve("subnet", Some(region), None)?;
    Ok(Reference::new(ResourceKind::Subnetwork.as_str(), name))
}

pub(crate) fn router(registry: &mut IdentifierRegistry, region: &str) -> Result<Reference> {
    let name = registry.reserve("router", Some(region), None)?;
    Ok(Reference::new(ResourceKind::Router.as_str(), name))
}

/// `var.primary_region` for the primary region, the literal name otherwise.
pub(crate) fn region_value(network: &NetworkConfig, region: &str) -> Value {
    if network.is_primary(region) {
        Value::var("primary_region")
    } else {
        Value::str(region)
    }
}

/// Cloud resource name `${var.application_name}-<suffix>`.
pub(crate) fn cloud_name(suffix: &str) -> Template {
    Template::new()
        .var("application_name")
        .lit(format!("-{}", suffix))
}

/// Cloud resource name `${var.application_name}-<suffix>-<region>`, where
/// the primary region is interpolated rather than written out.
pub(crate) fn regional_cloud_name(network: &NetworkConfig, suffix: &str, region: &str) -> Template {
    let name = Template::new()
        .var("application_name")
        .lit(format!("-{}-", suffix));
    if network.is_primary(region) {
        name.var("primary_region")
    } else {
        name.lit(region)
    }
}
