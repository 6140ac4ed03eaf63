//! Subcommands module for netform CLI

pub mod cost;
pub mod generate;
pub mod validate;
pub mod variables;

use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::OutputFormatter;
use netform::config::Settings;
use netform::topology::TopologyConfig;

/// Common context shared between commands
pub struct CommandContext {
    /// Tool settings
    pub settings: Settings,
    /// Output formatter
    pub output: OutputFormatter,
}

impl CommandContext {
    /// Create a new command context from CLI arguments
    pub fn new(cli: &crate::cli::Cli, settings: Settings) -> Self {
        let use_color = !cli.no_color && settings.output.color;
        let output = OutputFormatter::new(use_color, cli.output, cli.verbosity());

        Self { settings, output }
    }

    /// Load and validate a topology document
    pub fn load_topology(&self, path: &Path) -> Result<TopologyConfig> {
        self.output
            .info(&format!("Loading topology: {}", path.display()));
        let config = TopologyConfig::from_file(path)
            .with_context(|| format!("Invalid topology: {}", path.display()))?;
        tracing::debug!(
            application = %config.application_name(),
            workloads = config.workloads.len(),
            "Loaded topology"
        );
        Ok(config)
    }
}
