//! # uiflow
//!
//! Data-flow diagrams for UI components.
//!
//! uiflow turns framework-neutral component analyses (extracted from
//! JSX/TSX, Vue SFC, or Svelte SFC source by a separate layer) into
//! node/edge data-flow graphs: props, hooks, state, processes, and the
//! rendered output structure become typed nodes, subgraphs, and labeled
//! edges ready for a rendering layer.
//!
//! ## Key Features
//!
//! - **Framework-neutral**: React hooks, Vue refs/computed/watchers, and
//!   Svelte runes/stores normalize into one state model
//! - **Deterministic**: identical input produces identical ids and output
//! - **Total**: a build always returns a graph; bad records degrade to
//!   fallback handling, never abort
//! - **Queryable**: a petgraph-backed engine answers dependents and
//!   dependencies questions over the built diagram
//!
//! ## Quick Start
//!
//! ```rust
//! use uiflow::{ComponentAnalysis, DfdBuilder};
//!
//! let analysis: ComponentAnalysis =
//!     serde_json::from_str(r#"{"componentName": "Counter"}"#).unwrap();
//!
//! let dfd = DfdBuilder::new().build(&analysis);
//! assert!(dfd.nodes.is_empty());
//! ```

pub mod analysis;
pub mod error;
pub mod graph;

// Re-exports for convenience
pub use error::{Result, UiflowError};

pub use analysis::{
    normalize, ComponentAnalysis, Framework, HookCategory, HookInfo, NormalizedAnalysis,
    ProcessInfo, PropInfo, StructureNode,
};
pub use graph::{
    default_processors, DfdBuilder, DfdEdge, DfdGraph, DfdNode, DfdSourceData, DfdSubgraph,
    EdgeLabel, GraphStats, HookProcessor, NodeDetail, NodeKind, SubgraphKind,
};
