//! Integration tests for netform settings
//!
//! Covers:
//! - Default values for every section
//! - Loading settings from TOML, YAML and JSON files
//! - Environment variable overrides on top of a file
//! - Errors for missing or malformed files

use netform::config::{LoggingSettings, OutputSettings, PricingSettings, Settings};
use netform::generator::GeneratorOptions;
use serial_test::serial;
use std::path::PathBuf;
use tempfile::tempdir;

const OVERRIDE_VARS: &[&str] = &[
    "NETFORM_CONFIG",
    "NETFORM_PRICING_ENDPOINT",
    "NETFORM_PRICING_TIMEOUT",
    "NETFORM_OUTPUT_DIR",
    "NETFORM_PROVIDER_VERSION",
    "NETFORM_LOG_LEVEL",
    "NETFORM_NO_COLOR",
    "NO_COLOR",
];

fn clear_env() {
    for var in OVERRIDE_VARS {
        std::env::remove_var(var);
    }
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_default_sections() {
    let settings = Settings::default();
    assert_eq!(settings.generator, GeneratorOptions::default());
    assert_eq!(settings.pricing, PricingSettings::default());
    assert_eq!(settings.output, OutputSettings::default());
    assert_eq!(settings.logging, LoggingSettings::default());
    assert!(settings.output.color);
    assert!(!settings.logging.json);
}

#[test]
fn test_default_generator_options() {
    let options = GeneratorOptions::default();
    assert_eq!(options.terraform_version, ">= 1.0");
    assert_eq!(options.google_provider_version, "~> 5.0");
    assert_eq!(options.default_machine_type, "e2-medium");
}

// ============================================================================
// File formats
// ============================================================================

#[test]
fn test_load_toml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("netform.toml");
    std::fs::write(
        &path,
        r#"
[generator]
router_asn = 65100
default_machine_type = "n2-standard-4"

[pricing]
endpoint = "https://pricing.example.com/v1/quote"
timeout_secs = 10

[logging]
level = "debug"
json = true
"#,
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.generator.router_asn, 65100);
    assert_eq!(settings.generator.default_machine_type, "n2-standard-4");
    assert_eq!(settings.generator.node_disk_size_gb, 50);
    assert_eq!(
        settings.pricing.endpoint.as_deref(),
        Some("https://pricing.example.com/v1/quote")
    );
    assert_eq!(settings.pricing.timeout_secs, 10);
    assert_eq!(settings.logging.level, "debug");
    assert!(settings.logging.json);
}

#[test]
fn test_load_yaml_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("netform.yml");
    std::fs::write(
        &path,
        "generator:\n  serverless_image: us-docker.pkg.dev/acme/app:1.2\noutput:\n  color: false\n",
    )
    .unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(
        settings.generator.serverless_image,
        "us-docker.pkg.dev/acme/app:1.2"
    );
    assert!(!settings.output.color);
}

#[test]
fn test_load_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("netform.json");
    std::fs::write(&path, r#"{"output": {"directory": "terraform"}}"#).unwrap();

    let settings = Settings::from_file(&path).unwrap();
    assert_eq!(settings.output.directory, PathBuf::from("terraform"));
    assert_eq!(settings.generator, GeneratorOptions::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("netform.toml");
    std::fs::write(&path, "[generator\nrouter_asn = ").unwrap();

    let err = Settings::from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("netform.toml"));
}

#[test]
fn test_wrong_type_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("netform.toml");
    std::fs::write(&path, "[generator]\nrouter_asn = \"lots\"\n").unwrap();

    assert!(Settings::from_file(&path).is_err());
}

// ============================================================================
// Loading with environment overrides
// ============================================================================

#[test]
#[serial]
fn test_explicit_file_then_env() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(
        &path,
        "[pricing]\nendpoint = \"https://pricing.example.com\"\n[output]\ndirectory = \"infra\"\n",
    )
    .unwrap();

    std::env::set_var("NETFORM_OUTPUT_DIR", "/tmp/bundle");
    std::env::set_var("NETFORM_LOG_LEVEL", "info");
    let settings = Settings::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(
        settings.pricing.endpoint.as_deref(),
        Some("https://pricing.example.com")
    );
    assert_eq!(settings.output.directory, PathBuf::from("/tmp/bundle"));
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn test_empty_endpoint_disables_pricing() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[pricing]\nendpoint = \"https://pricing.example.com\"\n").unwrap();

    std::env::set_var("NETFORM_PRICING_ENDPOINT", "");
    let settings = Settings::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(settings.pricing.endpoint, None);
}

#[test]
#[serial]
fn test_invalid_timeout_is_ignored() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[pricing]\ntimeout_secs = 30\n").unwrap();

    std::env::set_var("NETFORM_PRICING_TIMEOUT", "soon");
    let settings = Settings::load(Some(&path)).unwrap();
    clear_env();

    assert_eq!(settings.pricing.timeout_secs, 30);
}

#[test]
#[serial]
fn test_no_color_env() {
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "[output]\ncolor = true\n").unwrap();

    std::env::set_var("NETFORM_NO_COLOR", "1");
    let settings = Settings::load(Some(&path)).unwrap();
    clear_env();

    assert!(!settings.output.color);
}

#[test]
#[serial]
fn test_missing_explicit_file_is_an_error() {
    clear_env();
    let missing = PathBuf::from("/nonexistent/netform/custom.toml");
    let err = Settings::load(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}
