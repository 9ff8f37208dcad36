// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Strongly connected components via Tarjan's algorithm.
//!
//! One linear pass with an explicit frame stack, so traversal depth is
//! independent of the host call stack. All state is per-call; independent
//! calls are safe from separate threads.

use crate::algo::GraphProjection;
use crate::algo::algorithms::Algorithm;
use strata_common::{NodeId, Result};
use std::cmp::Ordering;

pub struct Scc;

/// Node comparison used to fix the root visitation order.
pub type NodeOrdering = fn(NodeId, NodeId) -> Ordering;

#[derive(Debug, Clone, Default)]
pub struct SccConfig {
    /// Visit DFS roots in this order instead of slot order, making the
    /// output deterministic under a caller-chosen tie-break.
    pub stabilize: Option<NodeOrdering>,
}

pub struct SccResult {
    /// Components in completion order; each component's node order is the
    /// stack pop order. No inter-component order is guaranteed.
    pub components: Vec<Vec<NodeId>>,
}

impl Algorithm for Scc {
    type Config = SccConfig;
    type Result = SccResult;

    fn name() -> &'static str {
        "scc"
    }

    fn run(graph: &GraphProjection, config: Self::Config) -> Result<Self::Result> {
        let roots = root_order(graph, config.stabilize);
        let components = strongly_connected_slots(graph, None, &roots)
            .into_iter()
            .map(|comp| comp.into_iter().map(|s| graph.to_node(s)).collect())
            .collect();
        Ok(SccResult { components })
    }
}

/// DFS root visitation order: slot order, or the stabilization ordering.
pub(crate) fn root_order(graph: &GraphProjection, stabilize: Option<NodeOrdering>) -> Vec<u32> {
    let mut order: Vec<u32> = (0..graph.vertex_count() as u32).collect();
    if let Some(cmp) = stabilize {
        order.sort_by(|&a, &b| cmp(graph.to_node(a), graph.to_node(b)));
    }
    order
}

/// Tarjan over the subgraph induced by `mask` (`None` includes every
/// slot), visiting roots in the given order. Components are emitted in
/// completion order, members in pop order.
pub(crate) fn strongly_connected_slots(
    graph: &GraphProjection,
    mask: Option<&[bool]>,
    roots: &[u32],
) -> Vec<Vec<u32>> {
    const UNDEFINED: u32 = u32::MAX;
    let n = graph.vertex_count();
    let mut index = vec![UNDEFINED; n];
    let mut lowlink = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<u32> = Vec::new();
    let mut next_index = 0u32;
    let mut components: Vec<Vec<u32>> = Vec::new();

    // Explicit DFS frames: (vertex, next out-arc position)
    let mut frames: Vec<(u32, u32)> = Vec::new();

    let included = |v: u32| mask.is_none_or(|m| m[v as usize]);

    for &root in roots {
        if !included(root) || index[root as usize] != UNDEFINED {
            continue;
        }
        index[root as usize] = next_index;
        lowlink[root as usize] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root as usize] = true;
        frames.push((root, 0));

        while let Some(&(v, pos)) = frames.last() {
            let nbrs = graph.out_neighbors(v);
            if (pos as usize) < nbrs.len() {
                frames.last_mut().expect("frame present").1 += 1;
                let w = nbrs[pos as usize];
                if !included(w) {
                    continue;
                }
                if index[w as usize] == UNDEFINED {
                    index[w as usize] = next_index;
                    lowlink[w as usize] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w as usize] = true;
                    frames.push((w, 0));
                } else if on_stack[w as usize] {
                    lowlink[v as usize] = lowlink[v as usize].min(index[w as usize]);
                }
            } else {
                // v is finished; emit its component if it is a root of one.
                if lowlink[v as usize] == index[v as usize] {
                    let mut component = Vec::new();
                    loop {
                        let w = stack.pop().expect("component root on stack");
                        on_stack[w as usize] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    components.push(component);
                }
                frames.pop();
                if let Some(&(parent, _)) = frames.last() {
                    lowlink[parent as usize] = lowlink[parent as usize].min(lowlink[v as usize]);
                }
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_utils::build_directed;

    fn sorted(components: Vec<Vec<NodeId>>) -> Vec<Vec<NodeId>> {
        let mut comps: Vec<Vec<NodeId>> = components
            .into_iter()
            .map(|mut c| {
                c.sort_unstable();
                c
            })
            .collect();
        comps.sort();
        comps
    }

    fn reaches(g: &GraphProjection, from: u32, to: u32) -> bool {
        let mut seen = vec![false; g.vertex_count()];
        let mut queue = vec![from];
        seen[from as usize] = true;
        while let Some(v) = queue.pop() {
            if v == to {
                return true;
            }
            for &w in g.out_neighbors(v) {
                if !seen[w as usize] {
                    seen[w as usize] = true;
                    queue.push(w);
                }
            }
        }
        false
    }

    #[test]
    fn test_components_of_fixture() {
        let g = build_directed(
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
        );
        let result = Scc::run(&g, SccConfig::default()).unwrap();
        let comps = sorted(result.components);
        assert_eq!(comps.len(), 3);
        assert_eq!(comps[0], vec![NodeId::new(0), NodeId::new(1), NodeId::new(7)]);
        assert_eq!(
            comps[1],
            vec![
                NodeId::new(2),
                NodeId::new(3),
                NodeId::new(4),
                NodeId::new(6)
            ]
        );
        assert_eq!(comps[2], vec![NodeId::new(5)]);

        // Mutual reachability within each component.
        for comp in &comps {
            for &a in comp {
                for &b in comp {
                    let sa = g.to_slot(a).unwrap();
                    let sb = g.to_slot(b).unwrap();
                    assert!(reaches(&g, sa, sb));
                    assert!(reaches(&g, sb, sa));
                }
            }
        }
    }

    #[test]
    fn test_partitions_node_set() {
        let g = build_directed(
            &[0, 1, 2, 3],
            &[(0, 1, 1.0), (1, 0, 1.0), (1, 2, 1.0), (3, 2, 1.0)],
        );
        let result = Scc::run(&g, SccConfig::default()).unwrap();
        let mut all: Vec<NodeId> = result.components.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(
            all,
            vec![
                NodeId::new(0),
                NodeId::new(1),
                NodeId::new(2),
                NodeId::new(3)
            ]
        );
    }

    #[test]
    fn test_dag_yields_singletons() {
        let g = build_directed(&[0, 1, 2], &[(0, 1, 1.0), (1, 2, 1.0)]);
        let result = Scc::run(&g, SccConfig::default()).unwrap();
        assert_eq!(result.components.len(), 3);
        assert!(result.components.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_long_chain_does_not_overflow() {
        // 20k-node path; recursion depth equals chain length, which an
        // explicit frame stack must absorb.
        let nodes: Vec<u64> = (0..20_000).collect();
        let edges: Vec<(u64, u64, f64)> = (0..19_999).map(|i| (i, i + 1, 1.0)).collect();
        let g = build_directed(&nodes, &edges);
        let result = Scc::run(&g, SccConfig::default()).unwrap();
        assert_eq!(result.components.len(), 20_000);
    }

    #[test]
    fn test_stabilized_root_order() {
        let g = build_directed(&[0, 1, 2], &[]);
        let descending: NodeOrdering = |a, b| b.cmp(&a);
        let result = Scc::run(
            &g,
            SccConfig {
                stabilize: Some(descending),
            },
        )
        .unwrap();
        let flat: Vec<NodeId> = result.components.into_iter().flatten().collect();
        assert_eq!(flat, vec![NodeId::new(2), NodeId::new(1), NodeId::new(0)]);
    }
}
