// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Read contract between graph storage and the analysis core.

use crate::core::id::NodeId;

/// Read-only capability contract the analysis core consumes.
///
/// The core never mutates a source; it snapshots one into a dense CSR
/// projection before running anything. Edge presence is probed through
/// `edge_weight`: `Some(w)` means the edge exists with weight `w`, `None`
/// means absent. A zero weight is equivalent to absence for every analysis
/// in this core.
pub trait GraphSource {
    /// All node ids. Finite; restartable by calling again.
    fn nodes(&self) -> Vec<NodeId>;

    /// Successor set for directed graphs, full neighbor set for undirected.
    fn successors(&self, node: NodeId) -> Vec<NodeId>;

    /// Weight of the edge from `from` to `to`; `None` when absent.
    fn edge_weight(&self, from: NodeId, to: NodeId) -> Option<f64>;

    /// Directedness capability probe.
    fn is_directed(&self) -> bool;

    /// Whether the source natively stores weights. When false, every
    /// present edge weighs 1.0.
    fn is_weighted(&self) -> bool {
        false
    }
}
