// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Simple weighted adjacency-list graph.
//!
//! The concrete collaborator used by tests, examples, and embedders that
//! have no storage engine of their own:
//! - O(1) node lookup
//! - O(degree) neighbor iteration and edge lookup
//! - stable node enumeration in insertion order

use crate::core::id::NodeId;
use crate::graph::source::GraphSource;
use fxhash::FxBuildHasher;
use std::collections::HashMap;

/// Arc entry stored in adjacency lists.
#[derive(Clone, Copy, Debug)]
pub struct ArcEntry {
    pub to: NodeId,
    pub weight: f64,
}

/// Type alias for FxHashMap (faster hashing for integer keys)
type FxHashMap<K, V> = HashMap<K, V, FxBuildHasher>;

/// Weighted graph with adjacency lists, directed or undirected.
///
/// Undirected graphs store each edge as two arcs so that `neighbors`
/// answers the full neighbor set; self-loops are stored as a single arc.
/// Adding an arc that already exists accumulates its weight.
#[derive(Debug)]
pub struct SimpleGraph {
    directed: bool,
    /// Node enumeration in insertion order
    nodes: Vec<NodeId>,
    /// Adjacency lists: node -> [ArcEntry]
    adjacency: FxHashMap<NodeId, Vec<ArcEntry>>,
    /// Logical edge count (an undirected edge counts once)
    edge_count: usize,
}

impl SimpleGraph {
    /// Creates a new empty graph.
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            adjacency: HashMap::with_hasher(FxBuildHasher::default()),
            edge_count: 0,
        }
    }

    /// Creates a new graph with pre-allocated node capacity.
    pub fn with_capacity(directed: bool, nodes: usize) -> Self {
        Self {
            directed,
            nodes: Vec::with_capacity(nodes),
            adjacency: HashMap::with_capacity_and_hasher(nodes, FxBuildHasher::default()),
            edge_count: 0,
        }
    }

    /// Adds a node. Returns true if the node was newly added.
    pub fn add_node(&mut self, node: NodeId) -> bool {
        if self.adjacency.contains_key(&node) {
            return false;
        }
        self.nodes.push(node);
        self.adjacency.insert(node, Vec::new());
        true
    }

    /// Adds an edge, implicitly creating missing endpoints.
    ///
    /// Directed graphs store one arc, undirected graphs two (one per
    /// direction); a self-loop is a single arc either way. Re-adding an
    /// existing arc accumulates the weight onto it.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) {
        self.add_node(from);
        self.add_node(to);

        Self::push_arc(self.adjacency.get_mut(&from).unwrap(), to, weight);
        if !self.directed && from != to {
            Self::push_arc(self.adjacency.get_mut(&to).unwrap(), from, weight);
        }
        self.edge_count += 1;
    }

    fn push_arc(list: &mut Vec<ArcEntry>, to: NodeId, weight: f64) {
        if let Some(arc) = list.iter_mut().find(|a| a.to == to) {
            arc.weight += weight;
        } else {
            list.push(ArcEntry { to, weight });
        }
    }

    /// Checks if a node exists.
    pub fn contains_node(&self, node: NodeId) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of logical edges (an undirected edge counts once).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Arcs leaving `node`. O(degree).
    pub fn neighbors(&self, node: NodeId) -> &[ArcEntry] {
        self.adjacency.get(&node).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Weight of the arc from `from` to `to`, if present. O(degree).
    pub fn weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.neighbors(from)
            .iter()
            .find(|a| a.to == to)
            .map(|a| a.weight)
    }
}

impl GraphSource for SimpleGraph {
    fn nodes(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }

    fn successors(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbors(node).iter().map(|a| a.to).collect()
    }

    fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64> {
        self.weight(from, to)
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    fn is_weighted(&self) -> bool {
        true
    }
}
