//! Application workloads.
//!
//! One generator per workload kind. Symbolic names are keyed by workload
//! name only; the region lives in attributes so that moving a workload does
//! not rename it.

use indexmap::IndexMap;
use tracing::debug;

use super::{region_value, subnet, vpc, SectionContext, SectionGenerator};
use crate::error::{Error, Result};
use crate::generator::declaration::{ResourceDeclaration, ResourceKind, Section};
use crate::generator::ranges::RangeAllocator;
use crate::generator::registry::IdentifierRegistry;
use crate::hcl::{Body, Reference, Template, Value};
use crate::topology::{TopologyConfig, Workload, WorkloadKind};

const COMPUTE_IMAGE: &str = "debian-cloud/debian-11";
const HEALTH_CHECK_PORT: i64 = 80;
const HEALTH_CHECK_PATH: &str = "/health";
const CPU_TARGET: f64 = 0.7;
const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const GROUP_ENDPOINT: &[&str] = &["instance_group"];
const CLUSTER_ENDPOINT: &[&str] = &["endpoint"];
const SERVICE_ENDPOINT: &[&str] = &["status", "0", "url"];

/// Symbolic role and attribute path each kind exposes as its endpoint.
pub fn endpoint_of(kind: &WorkloadKind) -> Option<(&'static str, ResourceKind, &'static [&'static str])> {
    match kind {
        WorkloadKind::Compute => Some(("group", ResourceKind::InstanceGroupManager, GROUP_ENDPOINT)),
        WorkloadKind::Orchestrated => Some(("cluster", ResourceKind::ContainerCluster, CLUSTER_ENDPOINT)),
        WorkloadKind::Serverless => Some(("service", ResourceKind::CloudRunService, SERVICE_ENDPOINT)),
        WorkloadKind::Unsupported(_) => None,
    }
}

/// Reference to the endpoint attribute of a workload, for the outputs.
pub(crate) fn endpoint_reference(registry: &mut IdentifierRegistry, workload: &Workload) -> Result<Reference> {
    let (role, kind, path) = endpoint_of(&workload.kind).ok_or_else(|| unsupported(workload))?;
    let name = registry.reserve(role, None, Some(&workload.name))?;
    let mut reference = Reference::new(kind.as_str(), name);
    for step in path {
        reference = match step.parse::<usize>() {
            Ok(index) => reference.index(index),
            Err(_) => reference.attr(*step),
        };
    }
    Ok(reference)
}

fn unsupported(workload: &Workload) -> Error {
    Error::UnsupportedWorkloadKind {
        workload: workload.name.clone(),
        kind: workload.kind.as_str().to_string(),
    }
}

fn workload_name(workload: &Workload, suffix: &str) -> Template {
    Template::new()
        .var("application_name")
        .lit(format!("-{}{}", workload.name, suffix))
}

/// Workload resources, in input order.
pub struct WorkloadsSection;

impl SectionGenerator for WorkloadsSection {
    fn section(&self) -> Section {
        Section::Workloads
    }

    fn applies(&self, config: &TopologyConfig) -> bool {
        !config.workloads.is_empty()
    }

    fn generate(
        &self,
        ctx: &SectionContext<'_>,
        registry: &mut IdentifierRegistry,
    ) -> Result<Vec<ResourceDeclaration>> {
        let mut ranges = RangeAllocator::new(ctx.network())?;
        let mut out = Vec::new();

        for workload in &ctx.config.workloads {
            if !ctx.network().has_region(&workload.region) {
                return Err(Error::unresolved_region(
                    format!("workloads[{}].region", workload.name),
                    workload.region.clone(),
                ));
            }
            let decls = match &workload.kind {
                WorkloadKind::Compute => compute(ctx, workload, registry)?,
                WorkloadKind::Orchestrated => orchestrated(ctx, workload, registry, &mut ranges)?,
                WorkloadKind::Serverless => serverless(ctx, workload, registry)?,
                WorkloadKind::Unsupported(_) => return Err(unsupported(workload)),
            };
            debug!(
                workload = %workload.name,
                kind = %workload.kind,
                count = decls.len(),
                "Generated workload"
            );
            out.extend(decls);
        }

        Ok(out)
    }
}

fn compute(
    ctx: &SectionContext<'_>,
    workload: &Workload,
    registry: &mut IdentifierRegistry,
) -> Result<Vec<ResourceDeclaration>> {
    let net = ctx.network();
    let key = Some(workload.name.as_str());
    let subnet_ref = subnet(registry, &workload.region)?;
    let machine_type = workload
        .machine
        .machine_type
        .clone()
        .unwrap_or_else(|| ctx.options.default_machine_type.clone());
    let disk_size = workload
        .machine
        .disk_size_gb
        .unwrap_or(ctx.options.compute_disk_size_gb);

    let template = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::InstanceTemplate,
        registry.reserve("template", None, key)?,
        Body::new()
            .attr("name_prefix", workload_name(workload, "-"))
            .attr("machine_type", machine_type)
            .block(
                "disk",
                Body::new()
                    .attr("source_image", COMPUTE_IMAGE)
                    .attr("auto_delete", true)
                    .attr("boot", true)
                    .attr("disk_size_gb", i64::from(disk_size)),
            )
            .block(
                "network_interface",
                Body::new().attr("subnetwork", subnet_ref.attr("id")),
            )
            .attr("tags", Value::List(vec![workload_name(workload, "").into()]))
            .attr("metadata_startup_script", Value::var("startup_script"))
            .block("lifecycle", Body::new().attr("create_before_destroy", true)),
    );

    let health_check = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::HealthCheck,
        registry.reserve("health-check", None, key)?,
        Body::new()
            .attr("name", workload_name(workload, "-health-check"))
            .attr("timeout_sec", 5i64)
            .attr("check_interval_sec", 10i64)
            .block(
                "http_health_check",
                Body::new()
                    .attr("port", HEALTH_CHECK_PORT)
                    .attr("request_path", HEALTH_CHECK_PATH),
            ),
    );

    let group = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::InstanceGroupManager,
        registry.reserve("group", None, key)?,
        Body::new()
            .attr("name", workload_name(workload, "-mig"))
            .attr("region", region_value(net, &workload.region))
            .attr("base_instance_name", workload_name(workload, ""))
            .block(
                "version",
                Body::new().attr("instance_template", template.attr("id")),
            )
            .block(
                "auto_healing_policies",
                Body::new()
                    .attr("health_check", health_check.attr("id"))
                    .attr("initial_delay_sec", 300i64),
            ),
    );

    let autoscaler = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::Autoscaler,
        registry.reserve("autoscaler", None, key)?,
        Body::new()
            .attr("name", workload_name(workload, "-autoscaler"))
            .attr("region", region_value(net, &workload.region))
            .attr("target", group.attr("id"))
            .block(
                "autoscaling_policy",
                Body::new()
                    .attr("max_replicas", workload.scaling.max)
                    .attr("min_replicas", workload.scaling.min)
                    .attr("cooldown_period", 60i64)
                    .block("cpu_utilization", Body::new().attr("target", CPU_TARGET)),
            ),
    );

    Ok(vec![template, health_check, group, autoscaler])
}

fn orchestrated(
    ctx: &SectionContext<'_>,
    workload: &Workload,
    registry: &mut IdentifierRegistry,
    ranges: &mut RangeAllocator,
) -> Result<Vec<ResourceDeclaration>> {
    let net = ctx.network();
    let key = Some(workload.name.as_str());
    let vpc_ref = vpc(registry)?;
    let subnet_ref = subnet(registry, &workload.region)?;
    let allocated = ranges.allocate(&workload.name)?;
    let machine_type = workload
        .machine
        .machine_type
        .clone()
        .unwrap_or_else(|| ctx.options.default_machine_type.clone());
    let disk_size = workload
        .machine
        .disk_size_gb
        .unwrap_or(ctx.options.node_disk_size_gb);

    let cluster = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::ContainerCluster,
        registry.reserve("cluster", None, key)?,
        Body::new()
            .attr("name", workload_name(workload, "-cluster"))
            .attr("location", region_value(net, &workload.region))
            .attr("remove_default_node_pool", true)
            .attr("initial_node_count", 1i64)
            .attr("network", vpc_ref.attr("name"))
            .attr("subnetwork", subnet_ref.attr("name"))
            .block(
                "private_cluster_config",
                Body::new()
                    .attr("enable_private_nodes", true)
                    .attr("enable_private_endpoint", false)
                    .attr("master_ipv4_cidr_block", allocated.control_plane.to_string()),
            )
            .block(
                "ip_allocation_policy",
                Body::new()
                    .attr("cluster_ipv4_cidr_block", allocated.pods.to_string())
                    .attr("services_ipv4_cidr_block", allocated.services.to_string()),
            )
            .block(
                "workload_identity_config",
                Body::new().attr(
                    "workload_pool",
                    Template::new().var("project_id").lit(".svc.id.goog"),
                ),
            ),
    );

    let node_pool = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::ContainerNodePool,
        registry.reserve("node-pool", None, key)?,
        Body::new()
            .attr("name", workload_name(workload, "-nodes"))
            .attr("location", region_value(net, &workload.region))
            .attr("cluster", cluster.attr("name"))
            .attr("initial_node_count", workload.scaling.min)
            .block(
                "autoscaling",
                Body::new()
                    .attr("min_node_count", workload.scaling.min)
                    .attr("max_node_count", workload.scaling.max),
            )
            .block(
                "node_config",
                Body::new()
                    .attr("preemptible", false)
                    .attr("machine_type", machine_type)
                    .attr("disk_size_gb", i64::from(disk_size))
                    .attr("oauth_scopes", Value::strings([CLOUD_PLATFORM_SCOPE]))
                    .block(
                        "workload_metadata_config",
                        Body::new().attr("mode", "GKE_METADATA"),
                    ),
            ),
    );

    Ok(vec![cluster, node_pool])
}

fn serverless(
    ctx: &SectionContext<'_>,
    workload: &Workload,
    registry: &mut IdentifierRegistry,
) -> Result<Vec<ResourceDeclaration>> {
    let key = Some(workload.name.as_str());

    let mut limits = IndexMap::new();
    limits.insert("cpu".to_string(), Value::str("1000m"));
    limits.insert("memory".to_string(), Value::str("512Mi"));

    let mut annotations = IndexMap::new();
    annotations.insert(
        "autoscaling.knative.dev/maxScale".to_string(),
        Value::String(workload.scaling.max.to_string()),
    );
    annotations.insert(
        "autoscaling.knative.dev/minScale".to_string(),
        Value::String(workload.scaling.min.to_string()),
    );

    let service = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::CloudRunService,
        registry.reserve("service", None, key)?,
        Body::new()
            .attr("name", workload_name(workload, ""))
            .attr("location", region_value(ctx.network(), &workload.region))
            .block(
                "template",
                Body::new()
                    .block(
                        "spec",
                        Body::new().block(
                            "containers",
                            Body::new()
                                .attr("image", ctx.options.serverless_image.as_str())
                                .block("ports", Body::new().attr("container_port", 8080i64))
                                .block("resources", Body::new().attr("limits", Value::Map(limits))),
                        ),
                    )
                    .block(
                        "metadata",
                        Body::new().attr("annotations", Value::Map(annotations)),
                    ),
            )
            .block(
                "traffic",
                Body::new()
                    .attr("percent", 100i64)
                    .attr("latest_revision", true),
            ),
    );

    let invoker = ResourceDeclaration::new(
        Section::Workloads,
        ResourceKind::CloudRunInvoker,
        registry.reserve("invoker", None, key)?,
        Body::new()
            .attr("service", service.attr("name"))
            .attr("location", service.attr("location"))
            .attr("role", "roles/run.invoker")
            .attr("member", "allUsers"),
    );

    Ok(vec![service, invoker])
}
