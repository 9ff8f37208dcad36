// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

pub mod algo;

pub use algo::algorithms::{
    Algorithm, Community, ElementaryCircuits, ElementaryCircuitsConfig, ElementaryCircuitsResult,
    Louvain, LouvainConfig, LouvainLevel, LouvainResult, Modularity, ModularityConfig,
    ModularityResult, NodeOrdering, ReducedGraph, Scc, SccConfig, SccResult, TopologicalSort,
    TopologicalSortConfig, TopologicalSortResult, modularity, reduce,
};
pub use algo::projection::{GraphProjection, ProjectionBuilder};
pub use algo::IdMap;
