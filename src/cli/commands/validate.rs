//! Validate command

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use super::CommandContext;
use netform::generator::Generator;

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Topology document (YAML, JSON or TOML)
    pub topology: PathBuf,
}

#[derive(Serialize)]
struct ValidateReport<'a> {
    application: &'a str,
    valid: bool,
    declarations: usize,
    outputs: usize,
}

impl ValidateArgs {
    /// Loads the topology and assembles the template, discarding the text.
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let config = ctx.load_topology(&self.topology)?;
        let assembled = Generator::new(ctx.settings.generator.clone()).assemble(&config)?;

        ctx.output.document(&ValidateReport {
            application: config.application_name(),
            valid: true,
            declarations: assembled.declarations.len(),
            outputs: assembled.outputs.len(),
        })?;
        ctx.output.success(&format!(
            "{} is valid ({} resources, {} outputs)",
            self.topology.display(),
            assembled.declarations.len(),
            assembled.outputs.len()
        ));
        Ok(0)
    }
}
