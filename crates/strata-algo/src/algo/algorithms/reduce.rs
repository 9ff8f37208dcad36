// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Reduced (coarsened) graph construction.
//!
//! Collapses a partition into a weighted multigraph whose vertices are
//! communities. Weight between two communities is the sum of every base
//! arc crossing that pair; weight lying entirely inside a community is
//! retained as the community's internal weight rather than materialized
//! as a self-loop arc. Directedness of the base graph is preserved.

use crate::algo::GraphProjection;
use fxhash::FxHashMap;
use strata_common::{GraphError, NodeId, Result};

/// One vertex of a reduced graph: a set of base-graph nodes plus the
/// weight lying entirely inside the set. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Community {
    /// Dense id, equal to the community's slot in the reduced graph.
    pub id: u32,
    /// Base-graph nodes contained in this community.
    pub nodes: Vec<NodeId>,
    /// Sum of base arc weight with both endpoints inside the community,
    /// counted once per stored arc.
    pub internal_weight: f64,
}

/// A coarsened graph whose vertices are communities of a base graph.
///
/// Reduced node ids are dense, starting at 0, in the order the input
/// sets were given.
#[derive(Debug)]
pub struct ReducedGraph {
    pub graph: GraphProjection,
    pub communities: Vec<Community>,
}

impl ReducedGraph {
    /// Total internal weight across all communities.
    pub fn internal_weight(&self) -> f64 {
        self.communities.iter().map(|c| c.internal_weight).sum()
    }
}

/// Build the reduced graph of `partition` over `graph`.
///
/// Empty sets are dropped; the remaining sets must cover every node
/// exactly once or the call fails with `PartitionMismatch`.
pub fn reduce(graph: &GraphProjection, partition: &[Vec<NodeId>]) -> Result<ReducedGraph> {
    let n = graph.vertex_count();
    let mut seen = vec![false; n];
    let mut parts: Vec<Vec<u32>> = Vec::with_capacity(partition.len());
    for set in partition {
        if set.is_empty() {
            continue;
        }
        let mut slots = Vec::with_capacity(set.len());
        for &node in set {
            let slot = graph
                .to_slot(node)
                .ok_or_else(|| GraphError::PartitionMismatch {
                    message: format!("node {} is not in the graph", node),
                })?;
            if seen[slot as usize] {
                return Err(GraphError::PartitionMismatch {
                    message: format!("node {} appears in more than one community", node),
                });
            }
            seen[slot as usize] = true;
            slots.push(slot);
        }
        parts.push(slots);
    }
    if let Some(slot) = seen.iter().position(|&s| !s) {
        return Err(GraphError::PartitionMismatch {
            message: format!(
                "node {} is missing from the partition",
                graph.to_node(slot as u32)
            ),
        });
    }
    Ok(reduce_slots(graph, &parts, &[]))
}

/// Slot-level reduction. `parts` must be non-empty disjoint sets covering
/// every slot. `extra_loops` carries per-slot self-loop weight that is not
/// represented as arcs (the internal weight of a previous reduction); it
/// folds into the internal weight of the community owning the slot.
pub(crate) fn reduce_slots(
    graph: &GraphProjection,
    parts: &[Vec<u32>],
    extra_loops: &[f64],
) -> ReducedGraph {
    let n = graph.vertex_count();
    let ncomm = parts.len();

    let mut comm_of = vec![0u32; n];
    for (c, set) in parts.iter().enumerate() {
        for &slot in set {
            comm_of[slot as usize] = c as u32;
        }
    }

    let mut internal = vec![0.0; ncomm];
    let mut acc: FxHashMap<(u32, u32), f64> = FxHashMap::default();
    for slot in 0..n as u32 {
        let ci = comm_of[slot as usize];
        internal[ci as usize] += extra_loops.get(slot as usize).copied().unwrap_or(0.0);
        for (dst, w) in graph.out_arcs(slot) {
            let cj = comm_of[dst as usize];
            if ci == cj {
                internal[ci as usize] += w;
            } else {
                *acc.entry((ci, cj)).or_insert(0.0) += w;
            }
        }
    }

    // Accumulator iteration order is not deterministic; sort the arc list
    // so the reduced CSR is reproducible.
    let mut arcs: Vec<(u32, u32, f64)> = acc
        .into_iter()
        .filter(|&(_, w)| w > 0.0)
        .map(|((a, b), w)| (a, b, w))
        .collect();
    arcs.sort_unstable_by_key(|&(a, b, _)| (a, b));

    let node_ids: Vec<NodeId> = (0..ncomm as u64).map(NodeId::new).collect();
    let projection = GraphProjection::from_arc_list(graph.is_directed(), node_ids, &arcs);

    let communities = parts
        .iter()
        .enumerate()
        .map(|(c, set)| Community {
            id: c as u32,
            nodes: set.iter().map(|&s| graph.to_node(s)).collect(),
            internal_weight: internal[c],
        })
        .collect();

    ReducedGraph {
        graph: projection,
        communities,
    }
}
