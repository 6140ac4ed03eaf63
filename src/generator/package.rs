//! Artifact packager: turns the assembled template and variable table into
//! the four deliverable texts.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::assembler::AssembledTemplate;
use super::options::GeneratorOptions;
use super::variables::Variable;
use crate::error::Result;
use crate::hcl::{Block, Body, Document, Value};
use crate::topology::{TopologyConfig, WorkloadKind};

/// File name of the main text.
pub const MAIN_FILE: &str = "main.tf";
/// File name of the variable declarations.
pub const VARIABLES_FILE: &str = "variables.tf";
/// File name of the default values.
pub const DEFAULTS_FILE: &str = "terraform.tfvars";
/// File name of the documentation.
pub const DOCUMENTATION_FILE: &str = "README.md";

/// The four generated texts. A plain value; nothing is retained between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactBundle {
    /// Application name the bundle was generated for
    pub name: String,
    pub main: String,
    pub variables: String,
    pub defaults: String,
    pub documentation: String,
}

impl ArtifactBundle {
    /// `(file name, contents)` pairs in a fixed order.
    pub fn files(&self) -> [(&'static str, &str); 4] {
        [
            (MAIN_FILE, self.main.as_str()),
            (VARIABLES_FILE, self.variables.as_str()),
            (DEFAULTS_FILE, self.defaults.as_str()),
            (DOCUMENTATION_FILE, self.documentation.as_str()),
        ]
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(4);
        for (file, contents) in self.files() {
            let path = dir.join(file);
            std::fs::write(&path, contents)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Build the bundle.
pub fn package(
    assembled: &AssembledTemplate,
    variables: &[Variable],
    config: &TopologyConfig,
    options: &GeneratorOptions,
) -> ArtifactBundle {
    ArtifactBundle {
        name: config.application_name().to_string(),
        main: assembled.text.clone(),
        variables: render_declarations(variables),
        defaults: render_defaults(variables),
        documentation: render_documentation(assembled, variables, config, options),
    }
}

/// One `variable` block per entry.
pub fn render_declarations(variables: &[Variable]) -> String {
    let mut doc = Document::new();
    doc.comment("Input variables");
    for var in variables {
        let mut body = Body::new()
            .attr("description", var.description.as_str())
            .attr("type", Value::TypeConstraint(var.var_type().constraint()))
            .attr("default", var.default.to_value());
        if var.sensitive {
            body.push_attr("sensitive", true);
        }
        doc.block(Block::labeled("variable", [var.name.as_str()], body));
    }
    doc.render()
}

/// `name = value` per variable; placeholders are flagged for the operator.
pub fn render_defaults(variables: &[Variable]) -> String {
    let mut out = String::from("# Default values. Replace every placeholder before applying.\n\n");
    for var in variables {
        if var.placeholder {
            out.push_str("# placeholder: replace before applying\n");
        }
        let _ = writeln!(
            out,
            "{} = {}",
            var.name,
            crate::hcl::render_value(&var.default.to_literal(), 0)
        );
    }
    out
}

/// Structural facts of the topology. On/off toggles are left to the
/// `enable_*` variables.
fn topology_lines(config: &TopologyConfig) -> Vec<String> {
    let net = &config.network;
    let conn = &config.connectivity;
    let mut lines = Vec::new();

    if !net.secondary_regions.is_empty() {
        lines.push(format!(
            "Secondary regions: {}",
            net.secondary_regions.join(", ")
        ));
    }
    if conn.on_prem.enabled {
        lines.push(format!(
            "On-premises connectivity via {} ({} redundancy)",
            conn.on_prem.connection_type,
            conn.on_prem.redundancy.as_str()
        ));
    }
    let providers = conn.multi_cloud.active_providers();
    if !providers.is_empty() {
        let names: Vec<&str> = providers.iter().map(|p| p.name.label()).collect();
        lines.push(format!("Multi-cloud hubs for {}", names.join(", ")));
    }
    if conn.site_to_site.enabled {
        let mut line = "Site-to-site connectivity".to_string();
        if conn.site_to_site.transfers_data() {
            line.push_str(" with data transfer");
        }
        lines.push(line);
    }
    if !config.security.firewall_rules.is_empty() {
        lines.push(format!("{} firewall rule(s)", config.security.firewall_rules.len()));
    }
    lines
}

fn kind_label(kind: &WorkloadKind) -> &str {
    match kind {
        WorkloadKind::Compute => "Compute Engine managed instance group",
        WorkloadKind::Orchestrated => "GKE cluster",
        WorkloadKind::Serverless => "Cloud Run service",
        WorkloadKind::Unsupported(kind) => kind,
    }
}

/// Summary of enabled features plus standard operating instructions.
pub fn render_documentation(
    assembled: &AssembledTemplate,
    variables: &[Variable],
    config: &TopologyConfig,
    options: &GeneratorOptions,
) -> String {
    let name = config.application_name();
    let mut out = String::new();

    let _ = writeln!(out, "# {}\n", name);
    let _ = writeln!(
        out,
        "Terraform bundle for the `{}` network topology in project `{}`, primary region `{}`. \
         It declares {} resource(s).\n",
        name,
        config.identity.project_id,
        config.network.primary_region,
        assembled.declarations.len()
    );

    out.push_str("## Topology\n\n");
    let lines = topology_lines(config);
    if lines.is_empty() {
        out.push_str("Only the base network (VPC, subnet, router) is configured.\n");
    } else {
        for line in lines {
            let _ = writeln!(out, "- {}", line);
        }
    }

    let flags: Vec<&str> = variables
        .iter()
        .map(|v| v.name.as_str())
        .filter(|name| name.starts_with("enable_"))
        .collect();
    if !flags.is_empty() {
        out.push_str("\n## Feature flags\n\n");
        let _ = writeln!(
            out,
            "Feature toggles are set in `{}`; see that file for their current values:\n",
            DEFAULTS_FILE
        );
        for flag in flags {
            let _ = writeln!(out, "- `{}`", flag);
        }
    }

    out.push_str("\n## Workload endpoints\n\n");
    if config.workloads.is_empty() {
        out.push_str("This topology has zero workloads, so `workload_endpoints` is empty.\n");
    } else {
        let _ = writeln!(
            out,
            "{} workload endpoint(s) are exported in the `workload_endpoints` output:\n",
            config.workloads.len()
        );
        for workload in &config.workloads {
            let _ = writeln!(
                out,
                "- `{}`: {} in `{}`",
                workload.name,
                kind_label(&workload.kind),
                workload.region
            );
        }
    }

    let placeholders: Vec<&str> = variables
        .iter()
        .filter(|v| v.placeholder)
        .map(|v| v.name.as_str())
        .collect();
    if !placeholders.is_empty() {
        out.push_str("\n## Values to replace\n\n");
        let _ = writeln!(
            out,
            "These variables ship with placeholder defaults and must be set in `{}`:\n",
            DEFAULTS_FILE
        );
        for var in placeholders {
            let _ = writeln!(out, "- `{}`", var);
        }
    }

    let _ = write!(
        out,
        r#"
## Prerequisites

- Terraform {version}
- Google Cloud SDK, authenticated against the target project
- IAM permissions to create networking and compute resources

## Usage

1. Review the values in `{defaults}`
2. Initialize Terraform:
   ```bash
   terraform init
   ```
3. Plan the deployment:
   ```bash
   terraform plan -var-file="{defaults}"
   ```
4. Apply the configuration:
   ```bash
   terraform apply -var-file="{defaults}"
   ```

## Cleanup

```bash
terraform destroy -var-file="{defaults}"
```
"#,
        version = options.terraform_version,
        defaults = DEFAULTS_FILE,
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::assembler::assemble;
    use crate::generator::options::GeneratorOptions;
    use crate::generator::sections::fixtures;
    use crate::generator::variables::extract_variables;
    use pretty_assertions::assert_eq;

    fn bundle(config: &TopologyConfig) -> ArtifactBundle {
        let assembled = assemble(config, &GeneratorOptions::default()).unwrap();
        package(&assembled, &extract_variables(config), config, &GeneratorOptions::default())
    }

    #[test]
    fn test_variable_block_shape() {
        let text = bundle(&fixtures::shop()).variables;
        assert!(text.contains(
            "variable \"vpc_cidr\" {\n  description = \"CIDR block for the VPC network\"\n  type        = string\n  default     = \"10.0.0.0/16\"\n}\n"
        ));
        assert!(text.contains("type        = map(string)\n  default     = {}\n"));
        assert!(text.contains("type        = bool\n  default     = true\n"));
    }

    #[test]
    fn test_defaults_are_quoted() {
        let mut config = fixtures::with_secondary(fixtures::shop(), "us-east1", "10.0.2.0/24");
        config.connectivity.on_prem.enabled = true;
        let text = bundle(&config).defaults;

        assert!(text.contains("enable_flow_logs = \"false\"\n"));
        assert!(text.contains("secondary_subnet_cidrs = {\n  us-east1 = \"10.0.2.0/24\"\n}\n"));
        assert!(text.contains(
            "# placeholder: replace before applying\nvpn_shared_secret = \"your-shared-secret\"\n"
        ));
    }

    #[test]
    fn test_sensitive_flag() {
        let mut config = fixtures::shop();
        config.connectivity.on_prem.enabled = true;
        let text = bundle(&config).variables;
        assert!(text.contains("default     = \"your-shared-secret\"\n  sensitive   = true\n"));
    }

    #[test]
    fn test_startup_script_is_escaped() {
        let mut config = fixtures::shop();
        config
            .workloads
            .push(fixtures::workload("web", WorkloadKind::Compute, "us-central1"));
        let text = bundle(&config).defaults;
        assert!(text.contains("startup_script = \"#!/bin/bash\\napt-get update\\n"));
    }

    #[test]
    fn test_documentation_zero_workloads() {
        let doc = bundle(&fixtures::shop()).documentation;
        assert!(doc.starts_with("# shop\n"));
        assert!(doc.contains("zero workloads"));
        assert!(doc.contains("terraform init"));
        assert!(doc.contains("terraform destroy -var-file=\"terraform.tfvars\""));
        assert!(doc.contains("- Terraform >= 1.0"));
        assert!(!doc.contains("## Values to replace"));
    }

    #[test]
    fn test_documentation_points_flags_to_defaults() {
        let mut config = fixtures::shop();
        config.security.nat = true;
        config.connectivity.on_prem.enabled = true;
        let doc = bundle(&config).documentation;

        assert!(!doc.contains("Cloud NAT"));
        assert!(doc.contains("Feature toggles are set in `terraform.tfvars`"));
        assert!(doc.contains("- `enable_cloud_nat`\n"));
        assert!(!doc.contains("enable_cloud_nat = "));
        assert!(doc.contains("On-premises connectivity via Cloud VPN (low redundancy)"));
        assert!(doc.contains("- `on_prem_gateway_ip`"));
    }

    #[test]
    fn test_documentation_uses_configured_terraform_version() {
        let config = fixtures::shop();
        let options = GeneratorOptions {
            terraform_version: ">= 1.6".to_string(),
            ..Default::default()
        };
        let assembled = assemble(&config, &options).unwrap();
        let doc = package(&assembled, &extract_variables(&config), &config, &options).documentation;
        assert!(doc.contains("- Terraform >= 1.6\n"));
    }

    #[test]
    fn test_files_and_write() {
        let b = bundle(&fixtures::shop());
        let names: Vec<&str> = b.files().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["main.tf", "variables.tf", "terraform.tfvars", "README.md"]);

        let dir = tempfile::tempdir().unwrap();
        let written = b.write_to(dir.path().join("out")).unwrap();
        assert_eq!(written.len(), 4);
        let main = std::fs::read_to_string(dir.path().join("out").join("main.tf")).unwrap();
        assert_eq!(main, b.main);
    }
}
