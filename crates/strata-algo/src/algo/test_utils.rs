// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use crate::algo::projection::{GraphProjection, ProjectionBuilder};
use strata_common::{NodeId, SimpleGraph};

pub fn ids(raw: &[u64]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId::new).collect()
}

pub fn build_directed(nodes: &[u64], edges: &[(u64, u64, f64)]) -> GraphProjection {
    build(true, nodes, edges)
}

pub fn build_undirected(nodes: &[u64], edges: &[(u64, u64, f64)]) -> GraphProjection {
    build(false, nodes, edges)
}

fn build(directed: bool, nodes: &[u64], edges: &[(u64, u64, f64)]) -> GraphProjection {
    let mut g = SimpleGraph::with_capacity(directed, nodes.len());
    for &node in nodes {
        g.add_node(NodeId::new(node));
    }
    for &(from, to, weight) in edges {
        g.add_edge(NodeId::new(from), NodeId::new(to), weight);
    }
    ProjectionBuilder::new(&g).build().expect("valid test graph")
}
