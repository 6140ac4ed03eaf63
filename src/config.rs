//! Configuration module for netform
//!
//! Tool settings, not the topology. Loaded and merged from:
//! - Default values
//! - System configuration (/etc/netform/netform.toml)
//! - User configuration (~/.netform.toml)
//! - Project configuration (./netform.toml)
//! - Environment variables
//! - Command-line arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::generator::GeneratorOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Options that shape the generated bundle
    pub generator: GeneratorOptions,

    /// Live pricing settings
    pub pricing: PricingSettings,

    /// Output settings
    pub output: OutputSettings,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// Live pricing settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSettings {
    /// Pricing service URL; the local rate table is used when unset
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 5,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Directory the bundle is written to
    pub directory: PathBuf,

    /// Colored terminal output
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            color: true,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level used when no -v flag and no RUST_LOG is given
    pub level: String,

    /// Emit logs as JSON lines
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut settings = Settings::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                settings = settings.merge_from_file(&path)?;
            } else if config_path == Some(&path) {
                anyhow::bail!("Config file not found: {}", path.display());
            }
        }

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Get the list of configuration file paths to check
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        let mut paths = vec![PathBuf::from("/etc/netform/netform.toml")];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".netform.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("netform").join("netform.toml"));
        }

        paths.push(PathBuf::from("netform.toml"));

        if let Ok(env_config) = std::env::var("NETFORM_CONFIG") {
            paths.push(PathBuf::from(env_config));
        }

        paths
    }

    /// Merge configuration from a file
    fn merge_from_file(&self, path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let file_settings: Settings = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
            _ => toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        Ok(self.merge(file_settings))
    }

    /// Merge another config into this one; values that differ from the
    /// defaults win.
    fn merge(&self, other: Settings) -> Settings {
        let defaults = Settings::default();
        let pick = |base: &String, other: String, default: &String| {
            if &other != default {
                other
            } else {
                base.clone()
            }
        };

        let gen = other.generator;
        let base = &self.generator;
        let dgen = &defaults.generator;

        Settings {
            generator: GeneratorOptions {
                terraform_version: pick(
                    &base.terraform_version,
                    gen.terraform_version,
                    &dgen.terraform_version,
                ),
                google_provider_version: pick(
                    &base.google_provider_version,
                    gen.google_provider_version,
                    &dgen.google_provider_version,
                ),
                router_asn: if gen.router_asn != dgen.router_asn {
                    gen.router_asn
                } else {
                    base.router_asn
                },
                default_machine_type: pick(
                    &base.default_machine_type,
                    gen.default_machine_type,
                    &dgen.default_machine_type,
                ),
                compute_disk_size_gb: if gen.compute_disk_size_gb != dgen.compute_disk_size_gb {
                    gen.compute_disk_size_gb
                } else {
                    base.compute_disk_size_gb
                },
                node_disk_size_gb: if gen.node_disk_size_gb != dgen.node_disk_size_gb {
                    gen.node_disk_size_gb
                } else {
                    base.node_disk_size_gb
                },
                serverless_image: pick(
                    &base.serverless_image,
                    gen.serverless_image,
                    &dgen.serverless_image,
                ),
            },
            pricing: PricingSettings {
                endpoint: other.pricing.endpoint.or_else(|| self.pricing.endpoint.clone()),
                timeout_secs: if other.pricing.timeout_secs != defaults.pricing.timeout_secs {
                    other.pricing.timeout_secs
                } else {
                    self.pricing.timeout_secs
                },
            },
            output: OutputSettings {
                directory: if other.output.directory != defaults.output.directory {
                    other.output.directory
                } else {
                    self.output.directory.clone()
                },
                color: self.output.color && other.output.color,
            },
            logging: LoggingSettings {
                level: pick(&self.logging.level, other.logging.level, &defaults.logging.level),
                json: self.logging.json || other.logging.json,
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // NETFORM_PRICING_ENDPOINT
        if let Ok(endpoint) = std::env::var("NETFORM_PRICING_ENDPOINT") {
            self.pricing.endpoint = if endpoint.is_empty() { None } else { Some(endpoint) };
        }

        // NETFORM_PRICING_TIMEOUT
        if let Ok(timeout) = std::env::var("NETFORM_PRICING_TIMEOUT") {
            if let Ok(n) = timeout.parse() {
                self.pricing.timeout_secs = n;
            }
        }

        // NETFORM_OUTPUT_DIR
        if let Ok(dir) = std::env::var("NETFORM_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(dir);
        }

        // NETFORM_PROVIDER_VERSION
        if let Ok(version) = std::env::var("NETFORM_PROVIDER_VERSION") {
            self.generator.google_provider_version = version;
        }

        // NETFORM_LOG_LEVEL
        if let Ok(level) = std::env::var("NETFORM_LOG_LEVEL") {
            self.logging.level = level;
        }

        // NO_COLOR
        if std::env::var("NO_COLOR").is_ok() || std::env::var("NETFORM_NO_COLOR").is_ok() {
            self.output.color = false;
        }
    }

    /// Load from a specific file, without environment overrides
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        Settings::default().merge_from_file(&path_buf)
    }
}
