//! Variables command

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use super::CommandContext;
use netform::generator::extract_variables;

/// Arguments for the variables command
#[derive(Parser, Debug, Clone)]
pub struct VariablesArgs {
    /// Topology document (YAML, JSON or TOML)
    pub topology: PathBuf,
}

impl VariablesArgs {
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let config = ctx.load_topology(&self.topology)?;
        let variables = extract_variables(&config);

        ctx.output.document(&variables)?;

        let rows: Vec<Vec<String>> = variables
            .iter()
            .map(|v| {
                let mut flags = Vec::new();
                if v.sensitive {
                    flags.push("sensitive");
                }
                if v.placeholder {
                    flags.push("placeholder");
                }
                vec![
                    v.name.clone(),
                    v.var_type().to_string(),
                    flags.join(","),
                    v.description.clone(),
                ]
            })
            .collect();

        ctx.output
            .section(&format!("Variables for {}", config.application_name()));
        ctx.output.table(&["Name", "Type", "Flags", "Description"], &rows);
        Ok(0)
    }
}
