//! Property-based tests for netform using proptest.
//!
//! Random topologies are generated from a small region and feature space and
//! every bundle is checked for determinism, name uniqueness, backward-only
//! references and agreement between the variable tables.

mod common;

use std::collections::HashSet;

use proptest::prelude::*;
use proptest::sample::subsequence;

use common::TopologyBuilder;
use netform::generator::{extract_variables, generate, Generator};
use netform::hcl::escape_string;
use netform::topology::{CloudProvider, ConnectionType, Redundancy, TopologyConfig, WorkloadKind};

const SECONDARY_REGIONS: &[&str] = &["us-east1", "europe-west1", "asia-east1", "us-west2"];
const PROVIDERS: &[CloudProvider] = &[CloudProvider::Aws, CloudProvider::Azure, CloudProvider::Oracle];

// ============================================================================
// Strategies for generating test data
// ============================================================================

fn application_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9]{0,10}").unwrap()
}

fn workload_kind() -> impl Strategy<Value = WorkloadKind> {
    prop_oneof![
        Just(WorkloadKind::Compute),
        Just(WorkloadKind::Orchestrated),
        Just(WorkloadKind::Serverless),
    ]
}

fn on_prem() -> impl Strategy<Value = Option<(ConnectionType, Redundancy)>> {
    prop::option::of((
        prop_oneof![
            Just(ConnectionType::Vpn),
            Just(ConnectionType::Dedicated),
            Just(ConnectionType::Partner),
        ],
        prop_oneof![Just(Redundancy::High), Just(Redundancy::Low)],
    ))
}

prop_compose! {
    fn topology()(
        name in application_name(),
        secondaries in subsequence(SECONDARY_REGIONS.to_vec(), 0..=SECONDARY_REGIONS.len()),
        providers in subsequence(PROVIDERS.to_vec(), 0..=PROVIDERS.len()),
        link in on_prem(),
        flags in prop::array::uniform5(any::<bool>()),
        kinds in prop::collection::vec((workload_kind(), any::<prop::sample::Index>()), 0..6),
    ) -> TopologyConfig {
        let mut builder = TopologyBuilder::new(&name);
        for (i, region) in secondaries.iter().enumerate() {
            builder = builder.secondary_region(region, &format!("10.0.{}.0/24", i + 2));
        }
        for provider in providers {
            builder = builder.provider(provider);
        }
        if let Some((connection_type, redundancy)) = link {
            builder = builder.on_prem(connection_type, redundancy);
        }
        if flags[0] { builder = builder.flow_logs(); }
        if flags[1] { builder = builder.nat(); }
        if flags[2] { builder = builder.armor(); }
        if flags[3] { builder = builder.private_service_connect(); }
        if flags[4] { builder = builder.firewall("allow-web", &["80", "443"]); }

        let regions: Vec<&str> = std::iter::once("us-central1")
            .chain(secondaries.iter().copied())
            .collect();
        for (i, (kind, region)) in kinds.into_iter().enumerate() {
            builder = builder.workload(&format!("w{}", i), kind, region.get::<&str>(&regions));
        }
        builder.build()
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_generation_is_deterministic(config in topology()) {
        prop_assert_eq!(generate(&config).unwrap(), generate(&config).unwrap());
    }

    #[test]
    fn prop_names_are_unique(config in topology()) {
        let assembled = Generator::default().assemble(&config).unwrap();
        let names: Vec<&str> = assembled.names().collect();
        let unique: HashSet<&str> = names.iter().copied().collect();
        prop_assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn prop_references_point_backwards(config in topology()) {
        let assembled = Generator::default().assemble(&config).unwrap();
        let mut seen = HashSet::new();
        for declaration in &assembled.declarations {
            for reference in declaration.references() {
                prop_assert!(
                    seen.contains(&reference.address()),
                    "{} references {} before it is declared",
                    declaration.address(),
                    reference.address()
                );
            }
            seen.insert(declaration.address());
        }
        for output in &assembled.outputs {
            for reference in output.references() {
                prop_assert!(seen.contains(&reference.address()));
            }
        }
    }

    #[test]
    fn prop_used_variables_are_declared(config in topology()) {
        let assembled = Generator::default().assemble(&config).unwrap();
        let variables: HashSet<String> =
            extract_variables(&config).into_iter().map(|v| v.name).collect();
        for name in assembled.variables_used() {
            prop_assert!(variables.contains(name), "var.{} missing", name);
        }
    }

    #[test]
    fn prop_variable_count_ignores_regions(config in topology()) {
        let mut single = config.clone();
        single.network.secondary_regions.clear();
        single.network.subnet_cidrs.clear();
        single.workloads.retain(|w| w.region == "us-central1");

        let with = extract_variables(&config).len();
        let without = extract_variables(&single).len();
        let compute_only_secondary = config.workloads.iter().any(|w| w.kind == WorkloadKind::Compute)
            && !single.workloads.iter().any(|w| w.kind == WorkloadKind::Compute);
        prop_assert_eq!(with, without + usize::from(compute_only_secondary));
    }

    #[test]
    fn prop_escaped_strings_are_single_line(raw in "\\PC*[\\n\\r\\t\"${}%]*\\PC*") {
        let escaped = escape_string(&raw);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
        for marker in ["${", "%{"] {
            for (i, _) in escaped.match_indices(marker) {
                prop_assert!(i > 0 && escaped[..i].ends_with(&marker[..1]), "{:?}", escaped);
            }
        }
    }
}
