//! Query engine over a built DFD.
//!
//! Loads a `DfdSourceData` into a petgraph `DiGraph` with id and label
//! indexes, for dependents/dependencies queries and stats. Pure
//! supplement to construction; the builder never depends on it.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use super::types::{DfdSourceData, EdgeLabel, NodeKind};

/// A node as stored in the query graph. Subgraphs appear alongside plain
/// nodes with `NodeKind::Subgraph`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// One neighbor reached through a labeled edge.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyInfo {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub relation: String,
}

/// Aggregate counts over a loaded DFD.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub processes: usize,
    pub data_stores: usize,
    pub external_inputs: usize,
    pub external_outputs: usize,
    pub subgraphs: usize,
}

/// Directed graph over one built DFD, with lookup indexes.
#[derive(Debug, Default)]
pub struct DfdGraph {
    graph: DiGraph<GraphNode, EdgeLabel>,
    /// Index: node id -> graph index.
    id_index: HashMap<String, NodeIndex>,
    /// Index: display label -> graph indexes (labels are not unique).
    label_index: HashMap<String, Vec<NodeIndex>>,
}

impl DfdGraph {
    /// Load a built DFD. Edges whose endpoints are missing from the node
    /// set are skipped.
    pub fn from_source(data: &DfdSourceData) -> Self {
        let mut graph = Self::default();
        for node in &data.nodes {
            graph.insert(GraphNode {
                id: node.id.clone(),
                label: node.label.clone(),
                kind: node.kind,
            });
        }
        if let Some(root) = &data.root_subgraph {
            for sg in root.iter_subgraphs() {
                graph.insert(GraphNode {
                    id: sg.id.clone(),
                    label: sg.label.clone(),
                    kind: NodeKind::Subgraph,
                });
            }
        }
        for side in &data.subgraphs {
            for sg in side.iter_subgraphs() {
                graph.insert(GraphNode {
                    id: sg.id.clone(),
                    label: sg.label.clone(),
                    kind: NodeKind::Subgraph,
                });
            }
        }
        for edge in &data.edges {
            let (Some(&from), Some(&to)) = (
                graph.id_index.get(&edge.from),
                graph.id_index.get(&edge.to),
            ) else {
                debug!(from = %edge.from, to = %edge.to, "edge endpoint missing, skipped");
                continue;
            };
            graph.graph.add_edge(from, to, edge.label.clone());
        }
        graph
    }

    fn insert(&mut self, node: GraphNode) {
        let id = node.id.clone();
        let label = node.label.clone();
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        self.label_index.entry(label).or_default().push(idx);
    }

    /// All nodes carrying the given display label.
    pub fn find(&self, label: &str) -> Vec<&GraphNode> {
        self.label_index
            .get(label)
            .map(|indexes| indexes.iter().map(|&i| &self.graph[i]).collect())
            .unwrap_or_default()
    }

    /// Nodes with an edge pointing at any node labeled `label`.
    pub fn dependents(&self, label: &str) -> Vec<DependencyInfo> {
        self.neighbors(label, Direction::Incoming)
    }

    /// Nodes any node labeled `label` points at.
    pub fn dependencies(&self, label: &str) -> Vec<DependencyInfo> {
        self.neighbors(label, Direction::Outgoing)
    }

    fn neighbors(&self, label: &str, direction: Direction) -> Vec<DependencyInfo> {
        let Some(indexes) = self.label_index.get(label) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for &idx in indexes {
            for edge in self.graph.edges_directed(idx, direction) {
                let neighbor = match direction {
                    Direction::Incoming => edge.source(),
                    Direction::Outgoing => edge.target(),
                };
                let node = &self.graph[neighbor];
                out.push(DependencyInfo {
                    label: node.label.clone(),
                    kind: node.kind,
                    relation: edge.weight().to_string(),
                });
            }
        }
        out
    }

    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            edges: self.graph.edge_count(),
            nodes: self.graph.node_count(),
            ..Default::default()
        };
        for node in self.graph.node_weights() {
            match node.kind {
                NodeKind::Process => stats.processes += 1,
                NodeKind::DataStore => stats.data_stores += 1,
                NodeKind::ExternalInput => stats.external_inputs += 1,
                NodeKind::ExternalOutput => stats.external_outputs += 1,
                NodeKind::Subgraph => stats.subgraphs += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{DfdEdge, DfdNode, NodeDetail};

    fn fixture() -> DfdSourceData {
        DfdSourceData {
            nodes: vec![
                DfdNode {
                    id: "node_1".to_string(),
                    label: "count".to_string(),
                    kind: NodeKind::DataStore,
                    detail: NodeDetail::Plain,
                    line: None,
                    column: None,
                },
                DfdNode {
                    id: "node_2".to_string(),
                    label: "increment".to_string(),
                    kind: NodeKind::Process,
                    detail: NodeDetail::Process { is_cleanup: false },
                    line: None,
                    column: None,
                },
            ],
            edges: vec![
                DfdEdge::new("node_2", "node_1", EdgeLabel::bare("writes")),
                DfdEdge::new("node_1", "node_2", EdgeLabel::bare("reads")),
            ],
            root_subgraph: None,
            subgraphs: vec![],
        }
    }

    #[test]
    fn dependents_and_dependencies_by_label() {
        let graph = DfdGraph::from_source(&fixture());

        let deps = graph.dependencies("increment");
        assert!(deps.iter().any(|d| d.label == "count" && d.relation == "writes"));

        let dependents = graph.dependents("count");
        assert!(dependents
            .iter()
            .any(|d| d.label == "increment" && d.relation == "writes"));
    }

    #[test]
    fn missing_endpoint_edges_are_skipped() {
        let mut data = fixture();
        data.edges
            .push(DfdEdge::new("node_2", "node_99", EdgeLabel::bare("calls")));
        let graph = DfdGraph::from_source(&data);
        assert_eq!(graph.stats().edges, 2);
    }

    #[test]
    fn stats_count_by_kind() {
        let graph = DfdGraph::from_source(&fixture());
        let stats = graph.stats();
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.processes, 1);
        assert_eq!(stats.data_stores, 1);
        assert_eq!(stats.edges, 2);
    }

    #[test]
    fn unknown_label_queries_are_empty() {
        let graph = DfdGraph::from_source(&fixture());
        assert!(graph.find("nothing").is_empty());
        assert!(graph.dependents("nothing").is_empty());
    }
}
