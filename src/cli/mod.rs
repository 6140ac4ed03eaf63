//! CLI module for netform
//!
//! Argument parsing and subcommand dispatch for the `netform` binary.

pub mod commands;
pub mod completions;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// netform - Terraform bundles for Google Cloud network topologies
///
/// Reads a topology document and writes main.tf, variables.tf,
/// terraform.tfvars and README.md. Identical input gives identical output.
#[derive(Parser, Debug, Clone)]
#[command(name = "netform")]
#[command(author = "Netform Contributors")]
#[command(version)]
#[command(about = "Generate Terraform bundles for Google Cloud network topologies", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "NETFORM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    #[default]
    Human,
    /// JSON output for scripting
    Json,
    /// YAML output
    Yaml,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate the Terraform bundle for a topology
    Generate(commands::generate::GenerateArgs),

    /// Validate a topology without generating anything
    Validate(commands::validate::ValidateArgs),

    /// List the input variables a topology produces
    Variables(commands::variables::VariablesArgs),

    /// Estimate the monthly cost of a topology
    Cost(commands::cost::CostArgs),

    /// Print shell completions
    Completions(completions::CompletionsArgs),
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}
