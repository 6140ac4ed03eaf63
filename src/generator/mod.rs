//! Bundle generation.
//!
//! A [`Generator`] turns one validated [`TopologyConfig`] into an
//! [`ArtifactBundle`]. Generation is a pure function of the topology and the
//! [`GeneratorOptions`]: identical inputs produce byte-identical bundles.
//!
//! The pipeline:
//!
//! 1. validate the topology
//! 2. run the section generators in a fixed order, naming every resource
//!    through an [`IdentifierRegistry`]
//! 3. check every reference against the [`ReferenceGraph`]
//! 4. extract the variable table and check every `var.<name>` is declared
//! 5. render the four texts

pub mod assembler;
pub mod declaration;
pub mod graph;
pub mod options;
pub mod package;
pub mod ranges;
pub mod registry;
pub mod sections;
pub mod variables;

use tracing::{debug, info, instrument};

use crate::error::{Error, Result};
use crate::topology::TopologyConfig;

pub use assembler::{assemble, AssembledTemplate, OutputDeclaration};
pub use declaration::{ResourceDeclaration, ResourceKind, Section};
pub use graph::ReferenceGraph;
pub use options::GeneratorOptions;
pub use package::ArtifactBundle;
pub use ranges::{ClusterRanges, RangeAllocator};
pub use registry::IdentifierRegistry;
pub use variables::{extract_variables, Variable, VariableType, VariableValue};

/// Produces artifact bundles with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Assemble the main text only.
    pub fn assemble(&self, config: &TopologyConfig) -> Result<AssembledTemplate> {
        assemble(config, &self.options)
    }

    /// Generate the complete bundle.
    ///
    /// Fails without producing any text when the topology is invalid or the
    /// generated declarations do not hang together.
    #[instrument(skip_all, fields(application = %config.application_name()))]
    pub fn generate(&self, config: &TopologyConfig) -> Result<ArtifactBundle> {
        let assembled = self.assemble(config)?;
        let variables = extract_variables(config);
        check_variables(&assembled, &variables)?;

        let bundle = package::package(&assembled, &variables, config, &self.options);
        debug!(
            main_bytes = bundle.main.len(),
            variables_bytes = bundle.variables.len(),
            "Packaged bundle"
        );
        info!(
            declarations = assembled.declarations.len(),
            variables = variables.len(),
            "Generated bundle"
        );
        Ok(bundle)
    }
}

/// Every `var.<name>` read by the main text must appear in the variable table.
fn check_variables(assembled: &AssembledTemplate, variables: &[Variable]) -> Result<()> {
    let used = assembled.variables_used();
    // Providers read these outside any declaration.
    let provider_vars = ["project_id", "primary_region"];

    for name in used.into_iter().chain(provider_vars) {
        if !variables.iter().any(|v| v.name == name) {
            return Err(Error::DanglingReference {
                from: "main template".to_string(),
                target: format!("var.{}", name),
            });
        }
    }
    Ok(())
}

/// Generate a bundle with default options.
pub fn generate(config: &TopologyConfig) -> Result<ArtifactBundle> {
    Generator::default().generate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::sections::fixtures;
    use crate::topology::WorkloadKind;

    #[test]
    fn test_generate_is_deterministic() {
        let mut config = fixtures::with_secondary(fixtures::shop(), "us-east1", "10.0.2.0/24");
        config.security.nat = true;
        config
            .workloads
            .push(fixtures::workload("api", WorkloadKind::Orchestrated, "us-east1"));

        let first = generate(&config).unwrap();
        let second = generate(&config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_variable_is_dangling() {
        let assembled = assemble(&fixtures::shop(), &GeneratorOptions::default()).unwrap();
        let mut variables = extract_variables(&fixtures::shop());
        variables.retain(|v| v.name != "vpc_cidr");

        let err = check_variables(&assembled, &variables).unwrap_err();
        assert!(matches!(
            err,
            Error::DanglingReference { ref target, .. } if target == "var.vpc_cidr"
        ));
    }

    #[test]
    fn test_options_flow_into_bundle() {
        let options = GeneratorOptions {
            router_asn: 64600,
            ..Default::default()
        };
        let bundle = Generator::new(options).generate(&fixtures::shop()).unwrap();
        assert!(bundle.main.contains("asn = 64600"));
    }
}
