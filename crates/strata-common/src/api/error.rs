// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

use crate::core::id::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// Negative edge weights are a programming error for every analysis in
    /// this core; surfaced immediately, never corrected.
    #[error("Negative weight {weight} on edge {from} -> {to}")]
    NegativeEdgeWeight {
        from: NodeId,
        to: NodeId,
        weight: f64,
    },

    /// A partition that is not a partition: node missing from all sets,
    /// present in two sets, or unknown to the graph.
    #[error("Malformed partition: {message}")]
    PartitionMismatch { message: String },

    #[error("Argument '{arg}' is invalid: {message}")]
    InvalidArgument { arg: String, message: String },

    /// Topological sort over a cyclic graph. Recoverable: carries the
    /// offending strongly connected components; the partial order in the
    /// sort result is informational only when this is raised.
    #[error("Graph is not orderable: {} cyclic component(s)", .components.len())]
    Unorderable { components: Vec<Vec<NodeId>> },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
