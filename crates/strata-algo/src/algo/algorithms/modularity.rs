// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Resolution-adjusted modularity (Q).
//!
//! Scores how much denser a partition's communities are than the random
//! null model with the same degree sequence. Dispatches the undirected or
//! directed formula on the projection's directedness probe.
//!
//! Self-loop convention: A(i,i) counts the loop weight once, off-diagonal
//! pairs once per ordered direction, and the normalizer is the whole-matrix
//! sum. Under this convention the score is invariant under graph reduction,
//! which is what the Louvain driver relies on.

use crate::algo::GraphProjection;
use crate::algo::algorithms::Algorithm;
use strata_common::{GraphError, NodeId, Result};

pub struct Modularity;

#[derive(Debug, Clone)]
pub struct ModularityConfig {
    /// Partition to score. `None` means no partition: every node is its
    /// own community (the unclustered null score).
    pub partition: Option<Vec<Vec<NodeId>>>,
    /// Resolution parameter gamma; multiplies the null-model term.
    pub resolution: f64,
}

impl Default for ModularityConfig {
    fn default() -> Self {
        Self {
            partition: None,
            resolution: 1.0,
        }
    }
}

pub struct ModularityResult {
    pub q: f64,
}

impl Algorithm for Modularity {
    type Config = ModularityConfig;
    type Result = ModularityResult;

    fn name() -> &'static str {
        "modularity"
    }

    fn run(graph: &GraphProjection, config: Self::Config) -> Result<Self::Result> {
        let q = modularity(graph, config.partition.as_deref(), config.resolution)?;
        Ok(ModularityResult { q })
    }

    fn needs_weights() -> bool {
        true
    }
}

/// Resolution-adjusted modularity of `partition` on `graph`.
///
/// The partition must cover every node exactly once. Fails fast on a
/// malformed partition or a negative edge weight.
pub fn modularity(
    graph: &GraphProjection,
    partition: Option<&[Vec<NodeId>]>,
    resolution: f64,
) -> Result<f64> {
    let comm_of = match partition {
        Some(sets) => slot_partition(graph, sets)?,
        None => (0..graph.vertex_count() as u32).collect(),
    };
    modularity_by_slots(graph, &comm_of, resolution)
}

/// Validate a node-set partition and express it as a per-slot community
/// assignment. Community indices follow the input set order; empty sets
/// keep their index but assign nothing.
pub(crate) fn slot_partition(graph: &GraphProjection, sets: &[Vec<NodeId>]) -> Result<Vec<u32>> {
    const UNASSIGNED: u32 = u32::MAX;
    let mut comm_of = vec![UNASSIGNED; graph.vertex_count()];
    for (c, set) in sets.iter().enumerate() {
        for &node in set {
            let slot = graph
                .to_slot(node)
                .ok_or_else(|| GraphError::PartitionMismatch {
                    message: format!("node {} is not in the graph", node),
                })?;
            if comm_of[slot as usize] != UNASSIGNED {
                return Err(GraphError::PartitionMismatch {
                    message: format!("node {} appears in more than one community", node),
                });
            }
            comm_of[slot as usize] = c as u32;
        }
    }
    if let Some(slot) = comm_of.iter().position(|&c| c == UNASSIGNED) {
        return Err(GraphError::PartitionMismatch {
            message: format!(
                "node {} is missing from the partition",
                graph.to_node(slot as u32)
            ),
        });
    }
    Ok(comm_of)
}

/// Modularity over a per-slot community assignment.
pub(crate) fn modularity_by_slots(
    graph: &GraphProjection,
    comm_of: &[u32],
    resolution: f64,
) -> Result<f64> {
    let n = graph.vertex_count();
    if n == 0 {
        return Ok(0.0);
    }
    let ncomm = comm_of.iter().max().map_or(0, |&c| c as usize + 1);
    let mut internal = vec![0.0; ncomm];

    if graph.is_directed() {
        let mut tot_out = vec![0.0; ncomm];
        let mut tot_in = vec![0.0; ncomm];
        let mut m = 0.0;
        for slot in 0..n as u32 {
            let c = comm_of[slot as usize] as usize;
            for (dst, w) in graph.out_arcs(slot) {
                check_weight(graph, slot, dst, w)?;
                m += w;
                tot_out[c] += w;
                let cd = comm_of[dst as usize] as usize;
                tot_in[cd] += w;
                if cd == c {
                    internal[c] += w;
                }
            }
        }
        if m == 0.0 {
            return Ok(0.0);
        }
        let mut q = 0.0;
        for c in 0..ncomm {
            q += internal[c] / m - resolution * (tot_out[c] * tot_in[c]) / (m * m);
        }
        Ok(q)
    } else {
        let mut tot = vec![0.0; ncomm];
        let mut m2 = 0.0;
        for slot in 0..n as u32 {
            let c = comm_of[slot as usize] as usize;
            for (dst, w) in graph.out_arcs(slot) {
                check_weight(graph, slot, dst, w)?;
                m2 += w;
                tot[c] += w;
                if comm_of[dst as usize] as usize == c {
                    internal[c] += w;
                }
            }
        }
        if m2 == 0.0 {
            return Ok(0.0);
        }
        let mut q = 0.0;
        for c in 0..ncomm {
            q += internal[c] / m2 - resolution * (tot[c] / m2) * (tot[c] / m2);
        }
        Ok(q)
    }
}

#[inline]
fn check_weight(graph: &GraphProjection, from: u32, to: u32, weight: f64) -> Result<()> {
    if weight < 0.0 {
        return Err(GraphError::NegativeEdgeWeight {
            from: graph.to_node(from),
            to: graph.to_node(to),
            weight,
        });
    }
    Ok(())
}
