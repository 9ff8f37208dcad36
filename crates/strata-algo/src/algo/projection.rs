// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Graph projection - dense CSR representation for algorithm execution.
//!
//! A `GraphProjection` is a materialized, read-only snapshot of a
//! `GraphSource`. It provides:
//! - Dense vertex indexing (0..V) for array-based algorithm state
//! - CSR format for cache-friendly neighbor iteration
//! - Reverse edges for directed graphs (in-neighbor queries)
//! - Optional edge weights
//!
//! Undirected sources materialize each edge as two arcs, one per
//! direction; a self-loop is a single arc either way. Arcs with zero
//! weight are not stored (zero is equivalent to absence), and a negative
//! weight fails the build.

use crate::algo::IdMap;
use strata_common::{GraphError, GraphSource, NodeId, Result};
use tracing::debug;

/// Arc list for CSR construction: (source_slot, destination_slot, weight).
type ArcList = Vec<(u32, u32, f64)>;

/// Dense CSR representation optimized for algorithm execution.
#[derive(Debug, Clone)]
pub struct GraphProjection {
    /// Number of vertices in the projection
    pub(crate) vertex_count: usize,

    /// Whether the underlying graph is directed
    pub(crate) directed: bool,

    /// Outbound arcs: CSR format
    pub(crate) out_offsets: Vec<u32>, // [V+1] vertex slot -> arc start
    pub(crate) out_neighbors: Vec<u32>, // [A] neighbor slots

    /// Inbound arcs: CSR format, built for directed graphs only
    /// (an undirected graph answers in-queries from the outbound CSR)
    pub(crate) in_offsets: Vec<u32>,
    pub(crate) in_neighbors: Vec<u32>,

    /// Optional arc weights, parallel to the neighbor arrays
    pub(crate) out_weights: Option<Vec<f64>>,
    pub(crate) in_weights: Option<Vec<f64>>,

    /// Identity mapping
    pub(crate) id_map: IdMap,
}

/// Iterator over (neighbor_slot, weight) pairs of one vertex.
///
/// Unweighted projections yield 1.0 for every arc.
pub struct ArcIter<'a> {
    neighbors: &'a [u32],
    weights: Option<&'a [f64]>,
    pos: usize,
}

impl Iterator for ArcIter<'_> {
    type Item = (u32, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.neighbors.len() {
            return None;
        }
        let slot = self.neighbors[self.pos];
        let weight = self.weights.map_or(1.0, |w| w[self.pos]);
        self.pos += 1;
        Some((slot, weight))
    }
}

impl GraphProjection {
    /// Number of vertices in the projection.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of stored arcs. An undirected edge counts twice (once per
    /// direction), a self-loop once.
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.out_neighbors.len()
    }

    /// Directedness capability probe.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Check if arc weights are available.
    #[inline]
    pub fn has_weights(&self) -> bool {
        self.out_weights.is_some()
    }

    /// Outbound neighbors of a vertex (by slot).
    #[inline]
    pub fn out_neighbors(&self, slot: u32) -> &[u32] {
        let start = self.out_offsets[slot as usize] as usize;
        let end = self.out_offsets[slot as usize + 1] as usize;
        &self.out_neighbors[start..end]
    }

    /// Outbound degree of a vertex.
    #[inline]
    pub fn out_degree(&self, slot: u32) -> u32 {
        self.out_offsets[slot as usize + 1] - self.out_offsets[slot as usize]
    }

    /// Outbound (neighbor, weight) pairs of a vertex.
    #[inline]
    pub fn out_arcs(&self, slot: u32) -> ArcIter<'_> {
        let start = self.out_offsets[slot as usize] as usize;
        let end = self.out_offsets[slot as usize + 1] as usize;
        ArcIter {
            neighbors: &self.out_neighbors[start..end],
            weights: self.out_weights.as_ref().map(|w| &w[start..end]),
            pos: 0,
        }
    }

    /// Inbound (neighbor, weight) pairs of a vertex. For undirected graphs
    /// this is the same as `out_arcs`.
    #[inline]
    pub fn in_arcs(&self, slot: u32) -> ArcIter<'_> {
        if !self.directed {
            return self.out_arcs(slot);
        }
        let start = self.in_offsets[slot as usize] as usize;
        let end = self.in_offsets[slot as usize + 1] as usize;
        ArcIter {
            neighbors: &self.in_neighbors[start..end],
            weights: self.in_weights.as_ref().map(|w| &w[start..end]),
            pos: 0,
        }
    }

    /// Whether the vertex carries a self-loop arc.
    pub fn has_self_loop(&self, slot: u32) -> bool {
        self.out_neighbors(slot).contains(&slot)
    }

    /// Map slot back to node id.
    #[inline]
    pub fn to_node(&self, slot: u32) -> NodeId {
        self.id_map.node_at(slot)
    }

    /// Map node id to slot.
    #[inline]
    pub fn to_slot(&self, node: NodeId) -> Option<u32> {
        self.id_map.slot_of(node)
    }

    /// Iterate over all vertices as (slot, id).
    pub fn vertices(&self) -> impl Iterator<Item = (u32, NodeId)> + '_ {
        self.id_map.iter()
    }

    /// Memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        self.out_offsets.len() * 4
            + self.out_neighbors.len() * 4
            + self.in_offsets.len() * 4
            + self.in_neighbors.len() * 4
            + self.out_weights.as_ref().map_or(0, |w| w.len() * 8)
            + self.in_weights.as_ref().map_or(0, |w| w.len() * 8)
            + self.id_map.memory_size()
    }

    /// Build a projection directly from a dense arc list. Callers hand in
    /// node ids by slot (`node_ids[slot]`) and arcs between slots; weights
    /// must already be validated non-negative.
    pub(crate) fn from_arc_list(directed: bool, node_ids: Vec<NodeId>, arcs: &ArcList) -> Self {
        let vertex_count = node_ids.len();
        let id_map: IdMap = node_ids.into_iter().collect();

        let (out_offsets, out_neighbors, out_weights) = build_csr(vertex_count, arcs, false);
        let (in_offsets, in_neighbors, in_weights) = if directed {
            build_csr(vertex_count, arcs, true)
        } else {
            (vec![0; vertex_count + 1], Vec::new(), None)
        };

        GraphProjection {
            vertex_count,
            directed,
            out_offsets,
            out_neighbors,
            in_offsets,
            in_neighbors,
            out_weights,
            in_weights,
            id_map,
        }
    }
}

/// Builder snapshotting a `GraphSource` into a `GraphProjection`.
pub struct ProjectionBuilder<'a, G: GraphSource> {
    source: &'a G,
}

impl<'a, G: GraphSource> ProjectionBuilder<'a, G> {
    pub fn new(source: &'a G) -> Self {
        Self { source }
    }

    /// Build the projection.
    ///
    /// Nodes are assigned slots in ascending id order, so slot order is
    /// reproducible regardless of the source's enumeration order. Fails
    /// with `NegativeEdgeWeight` if the source reports a negative weight.
    pub fn build(self) -> Result<GraphProjection> {
        let directed = self.source.is_directed();
        let weighted = self.source.is_weighted();

        let mut node_ids = self.source.nodes();
        node_ids.sort_unstable();
        node_ids.dedup();

        let id_map: IdMap = node_ids.iter().copied().collect();
        let vertex_count = id_map.len();

        let mut arcs: ArcList = Vec::new();
        for (slot, node) in id_map.iter() {
            for succ in self.source.successors(node) {
                let Some(dst) = id_map.slot_of(succ) else {
                    continue;
                };
                let weight = if weighted {
                    match self.source.edge_weight(node, succ) {
                        Some(w) if w < 0.0 => {
                            return Err(GraphError::NegativeEdgeWeight {
                                from: node,
                                to: succ,
                                weight: w,
                            });
                        }
                        Some(w) => w,
                        None => 0.0,
                    }
                } else {
                    1.0
                };
                if weight == 0.0 {
                    continue;
                }
                arcs.push((slot, dst, weight));
            }
        }

        let (out_offsets, out_neighbors, raw_weights) = build_csr(vertex_count, &arcs, false);
        let out_weights = if weighted { raw_weights } else { None };
        let (in_offsets, in_neighbors, in_weights) = if directed {
            let (offsets, neighbors, weights) = build_csr(vertex_count, &arcs, true);
            (offsets, neighbors, if weighted { weights } else { None })
        } else {
            (vec![0; vertex_count + 1], Vec::new(), None)
        };

        debug!(
            vertices = vertex_count,
            arcs = out_neighbors.len(),
            directed,
            weighted,
            "projection built"
        );

        Ok(GraphProjection {
            vertex_count,
            directed,
            out_offsets,
            out_neighbors,
            in_offsets,
            in_neighbors,
            out_weights,
            in_weights,
            id_map,
        })
    }
}

/// Build one CSR direction from an arc list. With `reversed`, arcs are
/// indexed by destination (the inbound CSR of a directed graph).
fn build_csr(
    vertex_count: usize,
    arcs: &ArcList,
    reversed: bool,
) -> (Vec<u32>, Vec<u32>, Option<Vec<f64>>) {
    if vertex_count == 0 {
        return (vec![0], Vec::new(), None);
    }

    let key = |arc: &(u32, u32, f64)| if reversed { arc.1 } else { arc.0 };
    let val = |arc: &(u32, u32, f64)| if reversed { arc.0 } else { arc.1 };

    // Count degrees
    let mut degrees = vec![0u32; vertex_count];
    for arc in arcs {
        degrees[key(arc) as usize] += 1;
    }

    // Build offsets (prefix sum)
    let mut offsets = vec![0u32; vertex_count + 1];
    for i in 0..vertex_count {
        offsets[i + 1] = offsets[i] + degrees[i];
    }

    // Fill neighbors and weights
    let mut neighbors = vec![0u32; arcs.len()];
    let mut weights = vec![0.0; arcs.len()];
    let mut current = offsets.clone();

    for arc in arcs {
        let idx = current[key(arc) as usize] as usize;
        neighbors[idx] = val(arc);
        weights[idx] = arc.2;
        current[key(arc) as usize] += 1;
    }

    (offsets, neighbors, Some(weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::SimpleGraph;

    #[test]
    fn test_build_directed() {
        let mut g = SimpleGraph::new(true);
        g.add_edge(NodeId::new(0), NodeId::new(1), 1.0);
        g.add_edge(NodeId::new(1), NodeId::new(2), 1.0);
        g.add_edge(NodeId::new(2), NodeId::new(0), 1.0);
        g.add_edge(NodeId::new(0), NodeId::new(2), 0.5);

        let p = ProjectionBuilder::new(&g).build().unwrap();
        assert_eq!(p.vertex_count(), 3);
        assert!(p.is_directed());
        // Node 0 has arcs to 1 and 2
        assert_eq!(p.out_neighbors(0), &[1, 2]);
        let arcs: Vec<_> = p.out_arcs(0).collect();
        assert_eq!(arcs, vec![(1, 1.0), (2, 0.5)]);
        // Inbound CSR mirrors the arcs
        let into_two: Vec<_> = p.in_arcs(2).collect();
        assert_eq!(into_two, vec![(0, 0.5), (1, 1.0)]);
    }

    #[test]
    fn test_build_undirected_doubles_arcs() {
        let mut g = SimpleGraph::new(false);
        g.add_edge(NodeId::new(10), NodeId::new(20), 2.0);
        g.add_edge(NodeId::new(20), NodeId::new(20), 3.0); // self-loop

        let p = ProjectionBuilder::new(&g).build().unwrap();
        assert_eq!(p.vertex_count(), 2);
        // Edge stored once per direction, loop once
        assert_eq!(p.arc_count(), 3);
        assert!(p.has_self_loop(1));
        assert!(!p.has_self_loop(0));
    }

    #[test]
    fn test_slots_follow_id_order() {
        let mut g = SimpleGraph::new(true);
        g.add_edge(NodeId::new(50), NodeId::new(3), 1.0);
        let p = ProjectionBuilder::new(&g).build().unwrap();
        assert_eq!(p.to_node(0), NodeId::new(3));
        assert_eq!(p.to_node(1), NodeId::new(50));
        assert_eq!(p.to_slot(NodeId::new(50)), Some(1));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut g = SimpleGraph::new(false);
        g.add_edge(NodeId::new(0), NodeId::new(1), -1.0);
        let err = ProjectionBuilder::new(&g).build().unwrap_err();
        assert!(matches!(err, GraphError::NegativeEdgeWeight { .. }));
    }

    #[test]
    fn test_zero_weight_is_absence() {
        let mut g = SimpleGraph::new(true);
        g.add_node(NodeId::new(0));
        g.add_node(NodeId::new(1));
        g.add_edge(NodeId::new(0), NodeId::new(1), 0.0);
        let p = ProjectionBuilder::new(&g).build().unwrap();
        assert_eq!(p.arc_count(), 0);
    }
}
