//! Generate command

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;

use super::CommandContext;
use netform::generator::Generator;

/// Arguments for the generate command
#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    /// Topology document (YAML, JSON or TOML)
    pub topology: PathBuf,

    /// Directory to write the bundle into (defaults to output.directory)
    #[arg(short = 'o', long = "out-dir", env = "NETFORM_OUTPUT_DIR")]
    pub out_dir: Option<PathBuf>,

    /// Print main.tf to stdout instead of writing files
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Serialize)]
struct GenerateReport<'a> {
    application: &'a str,
    files: Vec<String>,
}

impl GenerateArgs {
    pub fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let config = ctx.load_topology(&self.topology)?;
        let generator = Generator::new(ctx.settings.generator.clone());
        let bundle = generator.generate(&config)?;

        if self.stdout {
            ctx.output.raw(&bundle.main);
            return Ok(0);
        }

        let dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| ctx.settings.output.directory.clone());
        let written = bundle
            .write_to(&dir)
            .with_context(|| format!("Failed to write bundle to {}", dir.display()))?;

        let files: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        ctx.output.document(&GenerateReport {
            application: &bundle.name,
            files: files.clone(),
        })?;
        ctx.output
            .success(&format!("Generated bundle for '{}'", bundle.name));
        ctx.output.list("Files", &files);
        ctx.output.flush();
        Ok(0)
    }
}
