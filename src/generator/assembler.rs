//! Template assembler.
//!
//! Runs the section generators in their fixed order, checks that every
//! reference points backwards, and renders the main text: preamble,
//! sections, outputs.

use indexmap::IndexMap;
use tracing::{debug, info};

use super::declaration::{ResourceDeclaration, ResourceKind, Section};
use super::graph::ReferenceGraph;
use super::options::GeneratorOptions;
use super::registry::IdentifierRegistry;
use super::sections::{self, multi_cloud, vpc, SectionContext};
use super::sections::{subnet, workloads::endpoint_reference};
use crate::error::Result;
use crate::hcl::{Block, Body, Document, Reference, Value};
use crate::topology::{ConnectionType, TopologyConfig};

/// A named output of the main text.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDeclaration {
    pub name: String,
    pub description: String,
    pub value: Value,
}

impl OutputDeclaration {
    fn new(name: &str, description: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            value: value.into(),
        }
    }

    /// References made by the output value.
    pub fn references(&self) -> Vec<&Reference> {
        let mut out = Vec::new();
        self.value.collect_references(&mut out);
        out
    }

    pub fn to_block(&self) -> Block {
        Block::labeled(
            "output",
            [self.name.as_str()],
            Body::new()
                .attr("description", self.description.as_str())
                .attr("value", self.value.clone()),
        )
    }
}

/// The assembled main text together with the structure it was rendered from.
#[derive(Debug, Clone)]
pub struct AssembledTemplate {
    pub text: String,
    pub declarations: Vec<ResourceDeclaration>,
    pub outputs: Vec<OutputDeclaration>,
    pub graph: ReferenceGraph,
}

impl AssembledTemplate {
    /// Symbolic names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }

    /// Declarations of one section.
    pub fn section(&self, section: Section) -> impl Iterator<Item = &ResourceDeclaration> {
        self.declarations.iter().filter(move |d| d.section == section)
    }

    /// Every variable read by the main text, first use first.
    pub fn variables_used(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        let bodies = self.declarations.iter().map(|d| &d.body);
        for name in bodies.flat_map(|b| b.variables()) {
            if !seen.contains(&name) {
                seen.push(name);
            }
        }
        seen
    }
}

/// Run every section and render the main text.
pub fn assemble(config: &TopologyConfig, options: &GeneratorOptions) -> Result<AssembledTemplate> {
    config.validate()?;

    let ctx = SectionContext::new(config, options);
    let mut registry = IdentifierRegistry::new(config.application_name());
    let mut declarations = Vec::new();

    for generator in sections::all() {
        if !generator.applies(config) {
            debug!(section = ?generator.section(), "Section skipped");
            continue;
        }
        let produced = generator.generate(&ctx, &mut registry)?;
        for declaration in &produced {
            registry.claim(&declaration.name, declaration.kind.as_str())?;
        }
        declarations.extend(produced);
    }

    let graph = ReferenceGraph::build(&declarations)?;
    let outputs = outputs(config, &mut registry)?;
    for output in &outputs {
        for reference in output.references() {
            graph.resolve(&format!("output.{}", output.name), reference)?;
        }
    }

    let text = render(config, options, &declarations, &outputs);
    info!(
        application = %config.application_name(),
        declarations = declarations.len(),
        references = graph.edge_count(),
        outputs = outputs.len(),
        "Assembled main template"
    );

    Ok(AssembledTemplate {
        text,
        declarations,
        outputs,
        graph,
    })
}

fn outputs(config: &TopologyConfig, registry: &mut IdentifierRegistry) -> Result<Vec<OutputDeclaration>> {
    let mut outputs = vec![
        OutputDeclaration::new(
            "network_id",
            "The ID of the VPC network",
            vpc(registry)?.attr("id"),
        ),
        OutputDeclaration::new(
            "primary_subnet_id",
            "The ID of the primary subnet",
            subnet(registry, &config.network.primary_region)?.attr("id"),
        ),
    ];

    let on_prem = &config.connectivity.on_prem;
    if on_prem.enabled && on_prem.connection_type == ConnectionType::Vpn {
        let name = registry.reserve("vpn-ip", None, None)?;
        outputs.push(OutputDeclaration::new(
            "vpn_gateway_ip",
            "External IP address of the VPN gateway",
            Reference::new(ResourceKind::Address.as_str(), name).attr("address"),
        ));
    }

    let providers = config.connectivity.multi_cloud.active_providers();
    if !providers.is_empty() {
        let mut hubs = IndexMap::new();
        for link in providers {
            let hub = multi_cloud::hub(registry, link.name.as_str())?;
            hubs.insert(link.name.as_str().to_string(), Value::Reference(hub.attr("id")));
        }
        outputs.push(OutputDeclaration::new(
            "connectivity_hubs",
            "Network Connectivity Center hub IDs, keyed by provider",
            Value::Map(hubs),
        ));
    }

    let mut endpoints = IndexMap::new();
    for workload in &config.workloads {
        let reference = endpoint_reference(registry, workload)?;
        endpoints.insert(workload.name.clone(), Value::Reference(reference));
    }
    outputs.push(OutputDeclaration::new(
        "workload_endpoints",
        "Endpoints of deployed workloads, keyed by workload name",
        Value::Map(endpoints),
    ));

    Ok(outputs)
}

fn provider_source(source: &str, version: &str) -> Value {
    Value::string_map([("source", source), ("version", version)])
}

fn render(
    config: &TopologyConfig,
    options: &GeneratorOptions,
    declarations: &[ResourceDeclaration],
    outputs: &[OutputDeclaration],
) -> String {
    let mut doc = Document::new();
    doc.comment(format!("Network topology for {}", config.application_name()));
    doc.comment("Generated by netform. Do not edit by hand; regenerate from the topology instead.");

    doc.block(Block::new(
        "terraform",
        Body::new()
            .attr("required_version", options.terraform_version.as_str())
            .block(
                "required_providers",
                Body::new()
                    .attr(
                        "google",
                        provider_source("hashicorp/google", &options.google_provider_version),
                    )
                    .attr(
                        "google-beta",
                        provider_source("hashicorp/google-beta", &options.google_provider_version),
                    ),
            ),
    ));

    for provider in ["google", "google-beta"] {
        doc.block(Block::labeled(
            "provider",
            [provider],
            Body::new()
                .attr("project", Value::var("project_id"))
                .attr("region", Value::var("primary_region")),
        ));
    }

    let mut current = None;
    for declaration in declarations {
        if current != Some(declaration.section) {
            doc.comment(declaration.section.title());
            current = Some(declaration.section);
        }
        doc.block(declaration.to_block());
    }

    doc.comment("Outputs");
    for output in outputs {
        doc.block(output.to_block());
    }

    doc.render()
}
