//! Reference graph over generated declarations.
//!
//! Built in declaration order: a reference may only point at a node that
//! already exists, so every edge runs from an earlier declaration to a later
//! one and the main text can be read top to bottom without forward jumps.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::declaration::ResourceDeclaration;
use crate::error::{Error, Result};
use crate::hcl::Reference;

/// Directed graph of `target -> referrer` edges keyed by resource address.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    graph: DiGraph<String, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl ReferenceGraph {
    /// Build the graph, failing on the first reference to something not
    /// declared earlier.
    pub fn build(declarations: &[ResourceDeclaration]) -> Result<Self> {
        let mut graph = Self::default();
        for declaration in declarations {
            graph.add(declaration)?;
        }
        Ok(graph)
    }

    fn add(&mut self, declaration: &ResourceDeclaration) -> Result<()> {
        let address = declaration.address();
        let mut targets = Vec::new();
        for reference in declaration.references() {
            targets.push(self.resolve(&address, reference)?);
        }

        let idx = self.graph.add_node(address.clone());
        self.node_indices.insert(address, idx);
        for target in targets {
            self.graph.update_edge(target, idx, ());
        }
        Ok(())
    }

    /// Look up the node a reference points at.
    pub fn resolve(&self, from: &str, reference: &Reference) -> Result<NodeIndex> {
        let target = reference.address();
        self.node_indices
            .get(&target)
            .copied()
            .ok_or_else(|| Error::DanglingReference {
                from: from.to_string(),
                target,
            })
    }

    /// Whether an address has been declared.
    pub fn contains(&self, address: &str) -> bool {
        self.node_indices.contains_key(address)
    }

    /// Addresses a declaration refers to directly, in insertion order.
    pub fn dependencies_of(&self, address: &str) -> Vec<String> {
        let Some(&idx) = self.node_indices.get(address) else {
            return Vec::new();
        };
        let mut deps: Vec<(NodeIndex, String)> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter_map(|n| self.graph.node_weight(n).map(|w| (n, w.clone())))
            .collect();
        deps.sort_by_key(|(n, _)| n.index());
        deps.into_iter().map(|(_, w)| w).collect()
    }

    /// Addresses that refer to a declaration directly.
    pub fn dependents_of(&self, address: &str) -> Vec<String> {
        let Some(&idx) = self.node_indices.get(address) else {
            return Vec::new();
        };
        let mut deps: Vec<(NodeIndex, String)> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(|w| (n, w.clone())))
            .collect();
        deps.sort_by_key(|(n, _)| n.index());
        deps.into_iter().map(|(_, w)| w).collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct declaration-to-declaration references.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::declaration::{ResourceKind, Section};
    use crate::hcl::Body;

    fn decl(kind: ResourceKind, name: &str, body: Body) -> ResourceDeclaration {
        ResourceDeclaration::new(Section::Network, kind, name, body)
    }

    #[test]
    fn test_builds_edges_in_order() {
        let vpc = decl(ResourceKind::Network, "shop-vpc", Body::new());
        let subnet = decl(
            ResourceKind::Subnetwork,
            "shop-subnet-us-central1",
            Body::new().attr("network", vpc.attr("id")),
        );
        let router = decl(
            ResourceKind::Router,
            "shop-router-us-central1",
            Body::new().attr("network", vpc.attr("id")),
        );

        let graph = ReferenceGraph::build(&[vpc.clone(), subnet.clone(), router.clone()]).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.dependencies_of(&subnet.address()), vec![vpc.address()]);
        assert_eq!(
            graph.dependents_of(&vpc.address()),
            vec![subnet.address(), router.address()]
        );
    }

    #[test]
    fn test_forward_reference_is_dangling() {
        let vpc = decl(ResourceKind::Network, "shop-vpc", Body::new());
        let subnet = decl(
            ResourceKind::Subnetwork,
            "shop-subnet-us-central1",
            Body::new().attr("network", vpc.attr("id")),
        );

        match ReferenceGraph::build(&[subnet, vpc]).unwrap_err() {
            Error::DanglingReference { from, target } => {
                assert_eq!(from, "google_compute_subnetwork.shop-subnet-us-central1");
                assert_eq!(target, "google_compute_network.shop-vpc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_dangling() {
        let vpc = decl(ResourceKind::Network, "shop-vpc", Body::new());
        let looped = decl(ResourceKind::Network, "shop-vpc", Body::new().attr("x", vpc.attr("id")));
        assert!(ReferenceGraph::build(&[looped]).is_err());
    }
}
