// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Topological sort.
//!
//! Post-processes Tarjan's components: in reverse completion order,
//! singleton components without a self-loop take their place in the
//! ordering, while any component with more than one node (or a
//! self-loop) is unorderable and leaves a placeholder at its position.
//! The cyclic components are reported alongside the partial order, so
//! callers can see both what ordered and what prevented a full order.

use crate::algo::GraphProjection;
use crate::algo::algorithms::Algorithm;
use crate::algo::algorithms::scc::{NodeOrdering, root_order, strongly_connected_slots};
use strata_common::{GraphError, NodeId, Result};

pub struct TopologicalSort;

#[derive(Debug, Clone, Default)]
pub struct TopologicalSortConfig {
    /// Tie-break ordering for nodes with no path between them. `None`
    /// orders ties by ascending node id.
    pub stabilize: Option<NodeOrdering>,
}

#[derive(Debug, Clone)]
pub struct TopologicalSortResult {
    /// One entry per strongly connected component, sources first. `None`
    /// marks the position of a cyclic component.
    pub order: Vec<Option<NodeId>>,
    /// The cyclic components, in order of their placeholders; each is
    /// internally sorted by the stabilization order.
    pub cycles: Vec<Vec<NodeId>>,
}

impl TopologicalSortResult {
    pub fn has_cycle(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// The complete ordering, or `Unorderable` carrying the cyclic
    /// components. When this errors, `order` is informational only.
    pub fn strict_order(&self) -> Result<Vec<NodeId>> {
        if self.has_cycle() {
            return Err(GraphError::Unorderable {
                components: self.cycles.clone(),
            });
        }
        Ok(self
            .order
            .iter()
            .map(|n| n.expect("acyclic order has no placeholders"))
            .collect())
    }
}

impl Algorithm for TopologicalSort {
    type Config = TopologicalSortConfig;
    type Result = TopologicalSortResult;

    fn name() -> &'static str {
        "topological_sort"
    }

    fn run(graph: &GraphProjection, config: Self::Config) -> Result<Self::Result> {
        // Components complete sinks-first; visiting roots in reverse
        // stabilization order makes the reversed completion order respect
        // the stabilization on ties.
        let mut roots = root_order(graph, config.stabilize);
        roots.reverse();
        let components = strongly_connected_slots(graph, None, &roots);

        let mut order = Vec::with_capacity(components.len());
        let mut cycles = Vec::new();
        for component in components.iter().rev() {
            if component.len() == 1 && !graph.has_self_loop(component[0]) {
                order.push(Some(graph.to_node(component[0])));
            } else {
                let mut cycle: Vec<NodeId> =
                    component.iter().map(|&s| graph.to_node(s)).collect();
                match config.stabilize {
                    Some(cmp) => cycle.sort_by(|&a, &b| cmp(a, b)),
                    None => cycle.sort_unstable(),
                }
                order.push(None);
                cycles.push(cycle);
            }
        }

        Ok(TopologicalSortResult { order, cycles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::test_utils::build_directed;

    fn position(order: &[NodeId], node: u64) -> usize {
        order
            .iter()
            .position(|&n| n == NodeId::new(node))
            .unwrap()
    }

    #[test]
    fn test_diamond_orders_every_edge() {
        let g = build_directed(
            &[0, 1, 2, 3],
            &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)],
        );
        let result = TopologicalSort::run(&g, TopologicalSortConfig::default()).unwrap();
        assert!(!result.has_cycle());

        let order = result.strict_order().unwrap();
        assert_eq!(order.len(), 4);
        for (u, v) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            assert!(position(&order, u) < position(&order, v));
        }
    }

    #[test]
    fn test_ties_come_out_ascending() {
        let g = build_directed(&[2, 0, 1], &[]);
        let result = TopologicalSort::run(&g, TopologicalSortConfig::default()).unwrap();
        assert_eq!(
            result.strict_order().unwrap(),
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]
        );
    }

    #[test]
    fn test_cycle_reported_with_placeholder() {
        // 0 feeds a 3-cycle that feeds 4.
        let g = build_directed(
            &[0, 1, 2, 3, 4],
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (3, 1, 1.0),
                (3, 4, 1.0),
            ],
        );
        let result = TopologicalSort::run(&g, TopologicalSortConfig::default()).unwrap();
        assert!(result.has_cycle());
        assert_eq!(
            result.cycles,
            vec![vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]]
        );
        assert_eq!(
            result.order,
            vec![Some(NodeId::new(0)), None, Some(NodeId::new(4))]
        );

        match result.strict_order() {
            Err(GraphError::Unorderable { components }) => {
                assert_eq!(components.len(), 1);
                assert_eq!(components[0].len(), 3);
            }
            other => panic!("expected Unorderable, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_self_loop_is_unorderable() {
        let g = build_directed(&[0, 1], &[(0, 0, 1.0), (0, 1, 1.0)]);
        let result = TopologicalSort::run(&g, TopologicalSortConfig::default()).unwrap();
        assert!(result.has_cycle());
        assert_eq!(result.cycles, vec![vec![NodeId::new(0)]]);
        assert_eq!(result.order, vec![None, Some(NodeId::new(1))]);
    }

    #[test]
    fn test_stabilized_tie_break() {
        let g = build_directed(&[0, 1, 2], &[]);
        let descending: NodeOrdering = |a, b| b.cmp(&a);
        let result = TopologicalSort::run(
            &g,
            TopologicalSortConfig {
                stabilize: Some(descending),
            },
        )
        .unwrap();
        assert_eq!(
            result.strict_order().unwrap(),
            vec![NodeId::new(2), NodeId::new(1), NodeId::new(0)]
        );
    }
}
