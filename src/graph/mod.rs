//! DFD graph module — construction core plus the query engine.
//!
//! Provides the output data model, the variable classifier and resolver,
//! subgraph construction, hook-processor strategies, node and edge
//! passes, the assembler, and a petgraph-backed query surface.

pub mod builder;
pub mod classify;
pub mod edges;
pub mod engine;
pub mod hooks;
pub mod nodes;
pub mod resolve;
pub mod subgraph;
pub mod types;

pub use builder::DfdBuilder;
pub use classify::{classify_variable, VarRole};
pub use engine::{DependencyInfo, DfdGraph, GraphNode, GraphStats};
pub use hooks::{default_processors, HookProcessor};
pub use resolve::find_node_by_variable;
pub use subgraph::{SubgraphBuilder, MAX_STRUCTURE_DEPTH};
pub use types::{
    DfdEdge, DfdNode, DfdSourceData, DfdSubgraph, EdgeLabel, NodeDetail, NodeKind,
    SubgraphElement, SubgraphKind,
};
