// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Louvain community detection.
//!
//! Multi-level modularity optimization: a local-move pass groups vertices
//! into communities, the communities become the vertices of a reduced
//! graph, and the process repeats until the partition stops coarsening.
//! Every level's communities are reported as sets of original node ids,
//! scored against the original graph, so modularity is non-decreasing
//! across levels. Works on undirected and directed projections.

use crate::algo::GraphProjection;
use crate::algo::algorithms::Algorithm;
use crate::algo::algorithms::modularity::modularity;
use crate::algo::algorithms::reduce::{ReducedGraph, reduce_slots};
use fxhash::FxHashMap;
use strata_common::{GraphError, NodeId, Result};
use tracing::debug;

pub struct Louvain;

#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// Resolution parameter gamma; higher values favor more, smaller
    /// communities. Must be >= 0.
    pub resolution: f64,
    /// Minimum modularity gain for a move to be taken. `None` uses
    /// machine epsilon scaled by the node count.
    pub tolerance: Option<f64>,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            tolerance: None,
        }
    }
}

/// One level of the hierarchy.
#[derive(Debug, Clone)]
pub struct LouvainLevel {
    /// The level's partition, expressed as sets of original node ids.
    pub communities: Vec<Vec<NodeId>>,
    /// Modularity of this partition, scored against the original graph.
    pub modularity: f64,
}

#[derive(Debug)]
pub struct LouvainResult {
    /// Modularity of the final partition against the original graph.
    pub modularity: f64,
    /// Every level produced, coarsest last. Empty only for an empty graph.
    pub levels: Vec<LouvainLevel>,
}

impl LouvainResult {
    /// The final (coarsest) partition.
    pub fn communities(&self) -> &[Vec<NodeId>] {
        self.levels
            .last()
            .map(|l| l.communities.as_slice())
            .unwrap_or(&[])
    }
}

impl Algorithm for Louvain {
    type Config = LouvainConfig;
    type Result = LouvainResult;

    fn name() -> &'static str {
        "louvain"
    }

    fn run(graph: &GraphProjection, config: Self::Config) -> Result<Self::Result> {
        if !(config.resolution >= 0.0) {
            return Err(GraphError::InvalidArgument {
                arg: "resolution".into(),
                message: format!("must be >= 0, got {}", config.resolution),
            });
        }
        if let Some(tol) = config.tolerance {
            if !(tol >= 0.0) {
                return Err(GraphError::InvalidArgument {
                    arg: "tolerance".into(),
                    message: format!("must be >= 0, got {}", tol),
                });
            }
        }

        let n = graph.vertex_count();
        if n == 0 {
            return Ok(LouvainResult {
                modularity: 0.0,
                levels: Vec::new(),
            });
        }
        let tolerance = config
            .tolerance
            .unwrap_or_else(|| f64::EPSILON * n as f64);

        let mut levels: Vec<LouvainLevel> = Vec::new();
        // Current level graph; `None` means level 0 (the input itself).
        let mut reduced: Option<ReducedGraph> = None;
        // Original node ids behind each current-level vertex.
        let mut membership: Vec<Vec<NodeId>> =
            (0..n as u32).map(|s| vec![graph.to_node(s)]).collect();
        // Self-loop weight per current-level vertex (internal weight of
        // the previous reduction; empty at level 0, where loops are arcs).
        let mut loops: Vec<f64> = Vec::new();

        loop {
            let g = reduced.as_ref().map(|r| &r.graph).unwrap_or(graph);

            let mut mover = LocalMover::new(g, &loops, config.resolution, tolerance);
            mover.optimize();
            let parts = mover.into_partition();

            let coarsened = parts.len() < g.vertex_count();
            if levels.is_empty() || coarsened {
                let expanded: Vec<Vec<NodeId>> = parts
                    .iter()
                    .map(|set| {
                        set.iter()
                            .flat_map(|&s| membership[s as usize].iter().copied())
                            .collect()
                    })
                    .collect();
                let q = modularity(graph, Some(&expanded), config.resolution)?;
                debug!(
                    level = levels.len(),
                    communities = expanded.len(),
                    q,
                    "louvain level complete"
                );
                levels.push(LouvainLevel {
                    communities: expanded,
                    modularity: q,
                });
            }
            if !coarsened {
                break;
            }

            let red = reduce_slots(g, &parts, &loops);
            membership = levels.last().expect("level recorded above").communities.clone();
            loops = red.communities.iter().map(|c| c.internal_weight).collect();
            reduced = Some(red);
        }

        let final_q = levels.last().map(|l| l.modularity).unwrap_or(0.0);
        Ok(LouvainResult {
            modularity: final_q,
            levels,
        })
    }

    fn needs_reverse() -> bool {
        true
    }

    fn needs_weights() -> bool {
        true
    }
}

/// Per-level local-move state: partition, reverse index, degree caches,
/// and community weight aggregates, all mutated in place.
struct LocalMover<'a> {
    graph: &'a GraphProjection,
    resolution: f64,
    tolerance: f64,
    directed: bool,
    /// Sum of all vertex strengths: 2m for undirected, m for directed.
    total: f64,
    k_out: Vec<f64>,
    /// In-strengths; populated for directed graphs only.
    k_in: Vec<f64>,
    /// community -> member slots
    communities: Vec<Vec<u32>>,
    /// slot -> (community, position within member list)
    comm_idx: Vec<(u32, u32)>,
    tot_out: Vec<f64>,
    tot_in: Vec<f64>,
    /// Scratch: arc weight from / to the scanned vertex per community.
    w_to: FxHashMap<u32, f64>,
    w_from: FxHashMap<u32, f64>,
}

impl<'a> LocalMover<'a> {
    /// `loops` carries self-loop weight per vertex that is not
    /// represented as arcs (internal weight of a previous reduction); it
    /// folds into the strength caches and is not needed afterwards.
    fn new(graph: &'a GraphProjection, loops: &[f64], resolution: f64, tolerance: f64) -> Self {
        let n = graph.vertex_count();
        let directed = graph.is_directed();

        let mut k_out = vec![0.0; n];
        let mut k_in = if directed { vec![0.0; n] } else { Vec::new() };
        for slot in 0..n as u32 {
            let loop_w = loops.get(slot as usize).copied().unwrap_or(0.0);
            let mut strength = loop_w;
            for (dst, w) in graph.out_arcs(slot) {
                strength += w;
                if directed {
                    k_in[dst as usize] += w;
                }
            }
            k_out[slot as usize] = strength;
            if directed {
                k_in[slot as usize] += loop_w;
            }
        }
        let total = k_out.iter().sum();

        Self {
            graph,
            resolution,
            tolerance,
            directed,
            total,
            tot_out: k_out.clone(),
            tot_in: k_in.clone(),
            k_out,
            k_in,
            communities: (0..n as u32).map(|s| vec![s]).collect(),
            comm_idx: (0..n as u32).map(|s| (s, 0)).collect(),
            w_to: FxHashMap::default(),
            w_from: FxHashMap::default(),
        }
    }

    /// Run full passes over all vertices in slot order until a complete
    /// pass makes no move.
    fn optimize(&mut self) {
        if self.total == 0.0 {
            return;
        }
        let n = self.graph.vertex_count() as u32;
        loop {
            let mut moves = 0usize;
            for v in 0..n {
                if self.scan(v) {
                    moves += 1;
                }
            }
            if moves == 0 {
                break;
            }
        }
    }

    /// Consider relocating `v`. Takes the candidate with the strictly
    /// largest gain; ties lose to the current community first and to the
    /// lowest community id second. Returns whether `v` moved.
    fn scan(&mut self, v: u32) -> bool {
        let cv = self.comm_idx[v as usize].0;

        self.w_to.clear();
        for (dst, w) in self.graph.out_arcs(v) {
            if dst != v {
                let c = self.comm_idx[dst as usize].0;
                *self.w_to.entry(c).or_insert(0.0) += w;
            }
        }
        if self.directed {
            self.w_from.clear();
            for (src, w) in self.graph.in_arcs(v) {
                if src != v {
                    let c = self.comm_idx[src as usize].0;
                    *self.w_from.entry(c).or_insert(0.0) += w;
                }
            }
        }

        // Evaluate candidates against aggregates with v taken out.
        self.tot_out[cv as usize] -= self.k_out[v as usize];
        if self.directed {
            self.tot_in[cv as usize] -= self.k_in[v as usize];
        }

        let mut candidates: Vec<u32> = self
            .w_to
            .keys()
            .chain(self.w_from.keys())
            .copied()
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let stay = self.score(cv, v);
        let mut best_comm = cv;
        let mut best = stay;
        for &c in &candidates {
            if c == cv {
                continue;
            }
            let s = self.score(c, v);
            if s > best {
                best = s;
                best_comm = c;
            }
        }

        let gain = if self.directed {
            (best - stay) / self.total
        } else {
            2.0 * (best - stay) / self.total
        };
        let moved = best_comm != cv && gain > self.tolerance;
        let target = if moved { best_comm } else { cv };

        self.tot_out[target as usize] += self.k_out[v as usize];
        if self.directed {
            self.tot_in[target as usize] += self.k_in[v as usize];
        }
        if moved {
            self.relocate(v, cv, target);
        }
        moved
    }

    /// Gain score of placing `v` into community `c`, up to terms constant
    /// across candidates. Aggregates must already exclude `v`.
    fn score(&self, c: u32, v: u32) -> f64 {
        let to = self.w_to.get(&c).copied().unwrap_or(0.0);
        if self.directed {
            let from = self.w_from.get(&c).copied().unwrap_or(0.0);
            to + from
                - self.resolution
                    * (self.k_out[v as usize] * self.tot_in[c as usize]
                        + self.k_in[v as usize] * self.tot_out[c as usize])
                    / self.total
        } else {
            to - self.resolution * self.k_out[v as usize] * self.tot_out[c as usize] / self.total
        }
    }

    /// Move `v` between member lists, keeping the reverse index exact.
    fn relocate(&mut self, v: u32, from: u32, to: u32) {
        let pos = self.comm_idx[v as usize].1 as usize;
        let list = &mut self.communities[from as usize];
        list.swap_remove(pos);
        if pos < list.len() {
            let swapped = list[pos];
            self.comm_idx[swapped as usize].1 = pos as u32;
        }
        let target = &mut self.communities[to as usize];
        self.comm_idx[v as usize] = (to, target.len() as u32);
        target.push(v);
    }

    /// Non-empty communities in ascending community id (the order they
    /// were discovered).
    fn into_partition(self) -> Vec<Vec<u32>> {
        self.communities.into_iter().filter(|c| !c.is_empty()).collect()
    }
}
