// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

//! Graph Analysis Engine
//!
//! Native graph algorithm implementations over dense CSR projections.
//!
//! # Architecture
//!
//! Every algorithm runs on a `GraphProjection`: a materialized, read-only
//! CSR snapshot of a `GraphSource` with dense vertex indexing (0..V) for
//! array-based state, reverse edges for directed graphs, and optional
//! edge weights. Algorithms are synchronous and keep all mutable state in
//! per-call structures; independent calls on distinct projections are
//! safe to run on separate threads.
//!
//! # Example
//!
//! ```ignore
//! use strata_algo::{Algorithm, Louvain, ProjectionBuilder};
//!
//! let projection = ProjectionBuilder::new(&graph).build()?;
//! let result = Louvain::run(&projection, Default::default())?;
//! ```

mod id_map;
pub mod projection;

pub mod algorithms;

pub use id_map::IdMap;
pub use projection::{ArcIter, GraphProjection, ProjectionBuilder};

#[cfg(test)]
pub mod test_utils;
