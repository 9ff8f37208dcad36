// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Core algorithm trait and the algorithm roster.

use crate::algo::GraphProjection;
use strata_common::Result;

/// Core trait for all graph algorithms.
pub trait Algorithm: Send + Sync {
    /// Algorithm parameters.
    type Config: Default + Clone + Send + 'static;
    /// Result type.
    type Result: Send + 'static;

    /// Algorithm identifier.
    fn name() -> &'static str;

    /// Execute the algorithm on a projection.
    ///
    /// Invalid input (negative weights, malformed partitions, bad
    /// arguments) fails fast with a typed error; it is never silently
    /// corrected.
    fn run(graph: &GraphProjection, config: Self::Config) -> Result<Self::Result>;

    /// Whether this algorithm reads reverse (inbound) arcs.
    fn needs_reverse() -> bool {
        false
    }

    /// Whether this algorithm requires edge weights.
    fn needs_weights() -> bool {
        false
    }
}

mod modularity;
pub use modularity::{Modularity, ModularityConfig, ModularityResult, modularity};

mod reduce;
pub use reduce::{Community, ReducedGraph, reduce};

mod louvain;
pub use louvain::{Louvain, LouvainConfig, LouvainLevel, LouvainResult};

mod scc;
pub use scc::{NodeOrdering, Scc, SccConfig, SccResult};

mod topological_sort;
pub use topological_sort::{TopologicalSort, TopologicalSortConfig, TopologicalSortResult};

mod elementary_circuits;
pub use elementary_circuits::{
    ElementaryCircuits, ElementaryCircuitsConfig, ElementaryCircuitsResult,
};
