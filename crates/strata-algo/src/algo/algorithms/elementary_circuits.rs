// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Elementary circuit enumeration (Johnson's algorithm).
//!
//! Finds every elementary cycle of a directed graph exactly once. The
//! graph is decomposed into strongly connected components; within each,
//! roots are processed in ascending slot order over the subgraph induced
//! by slots >= the root, and the decomposition of the remaining induced
//! subgraph is recomputed after each root so freshly split components are
//! searched independently. The search itself is the classic blocking DFS
//! with an unblock map, run on an explicit frame stack.
//!
//! Variants: a maximum cycle length (in edges), and restriction to cycles
//! passing through one node or any of a set of nodes.

use crate::algo::GraphProjection;
use crate::algo::algorithms::Algorithm;
use crate::algo::algorithms::scc::strongly_connected_slots;
use strata_common::{GraphError, NodeId, Result};

pub struct ElementaryCircuits;

#[derive(Debug, Clone, Default)]
pub struct ElementaryCircuitsConfig {
    /// Maximum cycle length in edges; `None` enumerates every length.
    pub max_length: Option<usize>,
    /// Restrict output to cycles through any of these nodes; empty means
    /// no restriction. Cycles through several of them are reported once.
    pub containing: Vec<NodeId>,
}

pub struct ElementaryCircuitsResult {
    /// Each cycle is the visited node sequence, the start node repeated
    /// at the end.
    pub cycles: Vec<Vec<NodeId>>,
}

impl Algorithm for ElementaryCircuits {
    type Config = ElementaryCircuitsConfig;
    type Result = ElementaryCircuitsResult;

    fn name() -> &'static str {
        "elementary_circuits"
    }

    fn run(graph: &GraphProjection, config: Self::Config) -> Result<Self::Result> {
        if config.max_length == Some(0) {
            return Err(GraphError::InvalidArgument {
                arg: "max_length".into(),
                message: "a cycle has at least one edge".into(),
            });
        }
        let n = graph.vertex_count();
        let mut anchors = Vec::with_capacity(config.containing.len());
        for &node in &config.containing {
            let slot = graph
                .to_slot(node)
                .ok_or_else(|| GraphError::InvalidArgument {
                    arg: "containing".into(),
                    message: format!("node {} is not in the graph", node),
                })?;
            anchors.push(slot);
        }
        anchors.sort_unstable();
        anchors.dedup();

        if n == 0 {
            return Ok(ElementaryCircuitsResult { cycles: Vec::new() });
        }

        let mut search = CircuitSearch::new(graph, config.max_length);
        if anchors.is_empty() {
            search.enumerate_all();
        } else {
            search.enumerate_containing(&anchors);
        }

        Ok(ElementaryCircuitsResult {
            cycles: search.cycles,
        })
    }
}

/// Per-call search state for the blocking DFS.
struct CircuitSearch<'a> {
    graph: &'a GraphProjection,
    max_length: Option<usize>,
    blocked: Vec<bool>,
    /// Unblock map: popping a vertex off the blocked set cascades through
    /// the vertices recorded against it.
    b_map: Vec<Vec<u32>>,
    path: Vec<u32>,
    cycles: Vec<Vec<NodeId>>,
}

/// One DFS frame: vertex, next out-arc position, and whether a cycle was
/// closed anywhere in the subtree.
struct Frame {
    v: u32,
    pos: u32,
    found: bool,
}

impl<'a> CircuitSearch<'a> {
    fn new(graph: &'a GraphProjection, max_length: Option<usize>) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            max_length,
            blocked: vec![false; n],
            b_map: vec![Vec::new(); n],
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    /// Full enumeration: every component, every root.
    fn enumerate_all(&mut self) {
        let n = self.graph.vertex_count();
        let all: Vec<u32> = (0..n as u32).collect();
        for component in strongly_connected_slots(self.graph, None, &all) {
            if component.len() == 1 && !self.graph.has_self_loop(component[0]) {
                continue;
            }
            let mut members = component;
            members.sort_unstable();

            let mut mask = vec![false; n];
            for &slot in &members {
                mask[slot as usize] = true;
            }
            for i in 0..members.len() {
                let root = members[i];
                if i > 0 {
                    // The previous root leaves the induced subgraph.
                    mask[members[i - 1] as usize] = false;
                }
                // Splitting off a root may fracture the rest; search only
                // the piece the current root still belongs to.
                let sub = strongly_connected_slots(self.graph, Some(&mask), &members[i..]);
                let Some(piece) = sub.into_iter().find(|c| c.contains(&root)) else {
                    continue;
                };
                if piece.len() == 1 && !self.graph.has_self_loop(root) {
                    continue;
                }
                let mut piece_mask = vec![false; n];
                for &slot in &piece {
                    piece_mask[slot as usize] = true;
                }
                self.search(root, &piece_mask);
            }
        }
    }

    /// Restricted enumeration: root the search only at the anchor nodes,
    /// removing each anchor from the graph once processed so a cycle
    /// through several anchors is found at the smallest one only.
    fn enumerate_containing(&mut self, anchors: &[u32]) {
        let n = self.graph.vertex_count();
        let mut mask = vec![true; n];
        let all: Vec<u32> = (0..n as u32).collect();
        for &start in anchors {
            let sub = strongly_connected_slots(self.graph, Some(&mask), &all);
            if let Some(piece) = sub.into_iter().find(|c| c.contains(&start)) {
                if piece.len() > 1 || self.graph.has_self_loop(start) {
                    let mut piece_mask = vec![false; n];
                    for &slot in &piece {
                        piece_mask[slot as usize] = true;
                    }
                    self.search(start, &piece_mask);
                }
            }
            mask[start as usize] = false;
        }
    }

    /// Blocking DFS from `root`, restricted to `mask`. Every cycle found
    /// is a path from root back to root with no repeated interior vertex.
    fn search(&mut self, root: u32, mask: &[bool]) {
        for slot in 0..mask.len() {
            if mask[slot] {
                self.blocked[slot] = false;
                self.b_map[slot].clear();
            }
        }
        self.path.clear();

        let mut frames = vec![self.enter(root)];
        while !frames.is_empty() {
            let top = frames.len() - 1;
            let v = frames[top].v;
            let nbrs = self.graph.out_neighbors(v);

            if (frames[top].pos as usize) < nbrs.len() {
                let w = nbrs[frames[top].pos as usize];
                frames[top].pos += 1;
                if !mask[w as usize] {
                    continue;
                }
                if w == root {
                    // Cycle length in edges equals the path node count.
                    if self.max_length.is_none_or(|k| self.path.len() <= k) {
                        let mut cycle: Vec<NodeId> = self
                            .path
                            .iter()
                            .map(|&s| self.graph.to_node(s))
                            .collect();
                        cycle.push(self.graph.to_node(root));
                        self.cycles.push(cycle);
                        frames[top].found = true;
                    }
                } else if !self.blocked[w as usize]
                    && self.max_length.is_none_or(|k| self.path.len() < k)
                {
                    frames.push(self.enter(w));
                }
            } else {
                let frame = frames.pop().expect("frame present");
                self.path.pop();
                if frame.found {
                    self.unblock(v);
                    if let Some(parent) = frames.last_mut() {
                        parent.found = true;
                    }
                } else if self.max_length.is_none() {
                    for &w in nbrs {
                        if mask[w as usize] && !self.b_map[w as usize].contains(&v) {
                            self.b_map[w as usize].push(v);
                        }
                    }
                } else {
                    // Length-bounded search keeps no persistent blocks: a
                    // vertex that dead-ends under one prefix can still lie
                    // on a shorter cycle under another.
                    self.blocked[v as usize] = false;
                }
            }
        }
    }

    fn enter(&mut self, v: u32) -> Frame {
        self.path.push(v);
        self.blocked[v as usize] = true;
        Frame {
            v,
            pos: 0,
            found: false,
        }
    }

    fn unblock(&mut self, v: u32) {
        let mut todo = vec![v];
        while let Some(u) = todo.pop() {
            self.blocked[u as usize] = false;
            let queued = std::mem::take(&mut self.b_map[u as usize]);
            for w in queued {
                if self.blocked[w as usize] {
                    todo.push(w);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_utils::{build_directed, ids};

    fn fixture() -> GraphProjection {
        build_directed(
            &[0, 1, 2, 3, 4, 5, 6, 7],
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (1, 7, 1.0),
                (2, 3, 1.0),
                (2, 6, 1.0),
                (3, 4, 1.0),
                (4, 2, 1.0),
                (4, 5, 1.0),
                (6, 3, 1.0),
                (6, 5, 1.0),
                (7, 0, 1.0),
                (7, 6, 1.0),
            ],
        )
    }

    fn sorted(mut cycles: Vec<Vec<NodeId>>) -> Vec<Vec<NodeId>> {
        cycles.sort();
        cycles
    }

    #[test]
    fn test_fixture_has_exactly_three_cycles() {
        let g = fixture();
        let result = ElementaryCircuits::run(&g, ElementaryCircuitsConfig::default()).unwrap();
        assert_eq!(
            sorted(result.cycles),
            vec![
                ids(&[0, 1, 7, 0]),
                ids(&[2, 3, 4, 2]),
                ids(&[2, 6, 3, 4, 2]),
            ]
        );
    }

    #[test]
    fn test_nested_cycles_found_once_each() {
        // 0->1->2->0 plus the chord 2->1.
        let g = build_directed(
            &[0, 1, 2],
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0), (2, 1, 1.0)],
        );
        let result = ElementaryCircuits::run(&g, ElementaryCircuitsConfig::default()).unwrap();
        assert_eq!(
            sorted(result.cycles),
            vec![ids(&[0, 1, 2, 0]), ids(&[1, 2, 1])]
        );
    }

    #[test]
    fn test_bounded_is_a_subset() {
        let g = fixture();
        let unbounded = ElementaryCircuits::run(&g, ElementaryCircuitsConfig::default()).unwrap();

        let bounded = ElementaryCircuits::run(
            &g,
            ElementaryCircuitsConfig {
                max_length: Some(3),
                containing: Vec::new(),
            },
        )
        .unwrap();

        assert_eq!(
            sorted(bounded.cycles.clone()),
            vec![ids(&[0, 1, 7, 0]), ids(&[2, 3, 4, 2])]
        );
        for cycle in &bounded.cycles {
            assert!(cycle.len() - 1 <= 3);
            assert!(unbounded.cycles.contains(cycle));
        }
    }

    #[test]
    fn test_containing_single_node() {
        let g = fixture();
        let result = ElementaryCircuits::run(
            &g,
            ElementaryCircuitsConfig {
                max_length: None,
                containing: vec![NodeId::new(6)],
            },
        )
        .unwrap();
        assert_eq!(sorted(result.cycles), vec![ids(&[6, 3, 4, 2, 6])]);
    }

    #[test]
    fn test_containing_set_reports_each_cycle_once() {
        let g = fixture();
        let result = ElementaryCircuits::run(
            &g,
            ElementaryCircuitsConfig {
                max_length: None,
                containing: vec![NodeId::new(2), NodeId::new(0), NodeId::new(4)],
            },
        )
        .unwrap();
        // Anchor 0 owns the left cycle; anchor 2 owns both right cycles;
        // anchor 4's cycles were already claimed by 2.
        assert_eq!(
            sorted(result.cycles),
            vec![
                ids(&[0, 1, 7, 0]),
                ids(&[2, 3, 4, 2]),
                ids(&[2, 6, 3, 4, 2]),
            ]
        );
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let g = build_directed(&[0, 1], &[(0, 0, 1.0), (0, 1, 1.0)]);
        let result = ElementaryCircuits::run(&g, ElementaryCircuitsConfig::default()).unwrap();
        assert_eq!(result.cycles, vec![ids(&[0, 0])]);
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        let g = build_directed(&[0, 1, 2], &[(0, 1, 1.0), (1, 2, 1.0)]);
        let result = ElementaryCircuits::run(&g, ElementaryCircuitsConfig::default()).unwrap();
        assert!(result.cycles.is_empty());
    }

    #[test]
    fn test_zero_bound_rejected() {
        let g = build_directed(&[0], &[]);
        let config = ElementaryCircuitsConfig {
            max_length: Some(0),
            containing: Vec::new(),
        };
        assert!(matches!(
            ElementaryCircuits::run(&g, config),
            Err(GraphError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_unknown_containing_node_rejected() {
        let g = build_directed(&[0], &[]);
        let config = ElementaryCircuitsConfig {
            max_length: None,
            containing: vec![NodeId::new(9)],
        };
        assert!(matches!(
            ElementaryCircuits::run(&g, config),
            Err(GraphError::InvalidArgument { .. })
        ));
    }
}
