// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Dragonscale Team

pub mod api {
    pub mod error;
}

pub mod core {
    pub mod id;
}

pub mod graph {
    pub mod simple_graph;
    pub mod source;
}

// Re-exports for convenience
pub use api::error::{GraphError, Result};
pub use core::id::NodeId;
pub use graph::simple_graph::SimpleGraph;
pub use graph::source::GraphSource;
