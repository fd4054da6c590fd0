//! Core types for the DFD graph.
//!
//! Defines node kinds, the closed per-category node detail variants,
//! edges with sub-labeled relationship text, and nested subgraphs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::Condition;

/// The kind of a node in the DFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// An event handler, effect, or other callable routine.
    #[serde(rename = "process")]
    Process,
    /// A piece of held state (ref, reactive value, reducer, store).
    #[serde(rename = "data-store")]
    DataStore,
    /// Data entering the component (props, fetched data, context).
    #[serde(rename = "external-entity-input")]
    ExternalInput,
    /// Data leaving the component (emitted events, callback invocations).
    #[serde(rename = "external-entity-output")]
    ExternalOutput,
    /// A nested grouping of nodes.
    #[serde(rename = "subgraph")]
    Subgraph,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Process => write!(f, "process"),
            NodeKind::DataStore => write!(f, "data-store"),
            NodeKind::ExternalInput => write!(f, "external-entity-input"),
            NodeKind::ExternalOutput => write!(f, "external-entity-output"),
            NodeKind::Subgraph => write!(f, "subgraph"),
        }
    }
}

/// Per-category node facts, as a closed tagged variant instead of an
/// open metadata bag. The resolver and the edge builders pattern-match
/// over these, which keeps illegal metadata combinations unrepresentable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum NodeDetail {
    /// A component prop.
    #[serde(rename_all = "camelCase")]
    Prop { is_function: bool },
    /// A read-write state pair collapsed to one node.
    #[serde(rename_all = "camelCase")]
    State {
        read_var: String,
        write_var: Option<String>,
        initial_value: Option<String>,
    },
    /// A reducer-shaped hook: one state object plus a dispatcher.
    #[serde(rename_all = "camelCase")]
    Reducer {
        state_var: String,
        dispatch_var: String,
        state_properties: Vec<String>,
    },
    /// A recognized library hook with pre-classified exposed names.
    #[serde(rename_all = "camelCase")]
    LibraryHook {
        library: String,
        data_properties: Vec<String>,
        process_properties: Vec<String>,
    },
    /// A data value exposed by an unrecognized custom hook.
    #[serde(rename_all = "camelCase")]
    CustomHookData { hook_name: String },
    /// A callable value exposed by an unrecognized custom hook.
    #[serde(rename_all = "camelCase")]
    CustomHookFunction { hook_name: String },
    /// A data binding consumed from context.
    #[serde(rename_all = "camelCase")]
    ContextData { variable: String },
    /// A callable binding consumed from context.
    #[serde(rename_all = "camelCase")]
    ContextFunction { variable: String },
    /// Framework-native state (ref, computed, rune, store subscription).
    #[serde(rename_all = "camelCase")]
    FrameworkState {
        /// Concrete kind tag, e.g. `vue-computed`, `svelte-derived`.
        state_category: String,
        dependencies: Vec<String>,
        initial_value: Option<String>,
        write_methods: Vec<String>,
    },
    /// A process (event handler, effect, watcher body).
    #[serde(rename_all = "camelCase")]
    Process { is_cleanup: bool },
    /// A rendered JSX/template element.
    #[serde(rename_all = "camelCase")]
    Element { tag_name: String },
    /// A declared custom event (emit/dispatch target).
    Event,
    /// A call target outside the component (fetch, API client).
    ExternalCall,
    /// A method exposed through an imperative ref handle.
    #[serde(rename_all = "camelCase")]
    ExportedHandler { ref_name: String },
    /// No category-specific facts.
    Plain,
}

/// A node in the DFD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfdNode {
    /// Build-unique generated id, never reused within one build.
    pub id: String,
    /// Display name: a variable name, tag name, or synthesized phrase.
    /// Not required to be unique.
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(flatten)]
    pub detail: NodeDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// An edge label of the form `base` or `base: detail`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeLabel {
    pub base: String,
    pub detail: Option<String>,
}

impl EdgeLabel {
    pub fn bare(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            detail: None,
        }
    }

    pub fn with_detail(base: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            detail: Some(detail.into()),
        }
    }

    /// Attach a detail only when one is present.
    pub fn maybe_detail(base: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            base: base.into(),
            detail,
        }
    }
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.base, detail),
            None => write!(f, "{}", self.base),
        }
    }
}

impl From<&str> for EdgeLabel {
    fn from(text: &str) -> Self {
        match text.split_once(": ") {
            Some((base, detail)) => EdgeLabel::with_detail(base, detail),
            None => EdgeLabel::bare(text),
        }
    }
}

impl Serialize for EdgeLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(EdgeLabel::from(text.as_str()))
    }
}

/// A labeled edge between two nodes or subgraphs (by id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfdEdge {
    pub from: String,
    pub to: String,
    pub label: EdgeLabel,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_cleanup: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_long_arrow: bool,
}

impl DfdEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: EdgeLabel) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label,
            is_cleanup: false,
            is_long_arrow: false,
        }
    }
}

/// The kind of a subgraph grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubgraphKind {
    /// The root grouping of the component's rendered output.
    JsxOutput,
    /// A conditionally rendered region.
    Conditional,
    /// A repeated region.
    Loop,
    /// Imperative handlers exported through a ref handle.
    ExportedHandlers,
    /// Declared custom events.
    Emits,
}

/// An ordered element of a subgraph: either a node reference (by id) or
/// a nested subgraph. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubgraphElement {
    Node(String),
    Nested(DfdSubgraph),
}

/// A nested grouping of nodes in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfdSubgraph {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: SubgraphKind,
    #[serde(default)]
    pub elements: Vec<SubgraphElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Default for DfdSubgraph {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            kind: SubgraphKind::JsxOutput,
            elements: Vec::new(),
            condition: None,
        }
    }
}

impl DfdSubgraph {
    /// Iterate this subgraph and all nested subgraphs, depth-first.
    pub fn iter_subgraphs(&self) -> Vec<&DfdSubgraph> {
        let mut out = vec![self];
        for element in &self.elements {
            if let SubgraphElement::Nested(nested) = element {
                out.extend(nested.iter_subgraphs());
            }
        }
        out
    }
}

/// The complete result of one DFD build. A plain, serializable value;
/// the rendering layer turns it into a diagram description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfdSourceData {
    #[serde(default)]
    pub nodes: Vec<DfdNode>,
    #[serde(default)]
    pub edges: Vec<DfdEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_subgraph: Option<DfdSubgraph>,
    /// Side-collection of exported subgroups (ref handlers, emits).
    #[serde(default)]
    pub subgraphs: Vec<DfdSubgraph>,
}

/// Arena owning the nodes of one build; assigns sequential ids.
///
/// Counters start fresh per build, so identical input produces identical
/// ids and the output is deterministic.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<DfdNode>,
    counter: u32,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("node_{}", self.counter)
    }

    /// Add a node unconditionally. Used for elements, which are distinct
    /// per occurrence even when tags repeat.
    pub fn add(
        &mut self,
        label: impl Into<String>,
        kind: NodeKind,
        detail: NodeDetail,
        line: Option<u32>,
        column: Option<u32>,
    ) -> String {
        let id = self.next_id();
        self.nodes.push(DfdNode {
            id: id.clone(),
            label: label.into(),
            kind,
            detail,
            line,
            column,
        });
        id
    }

    /// Add a node unless one with the same label and detail category
    /// already exists. Returns the id of the existing or new node.
    pub fn add_unique(
        &mut self,
        label: impl Into<String>,
        kind: NodeKind,
        detail: NodeDetail,
        line: Option<u32>,
        column: Option<u32>,
    ) -> String {
        let label = label.into();
        let discriminant = std::mem::discriminant(&detail);
        if let Some(existing) = self
            .nodes
            .iter()
            .find(|n| n.label == label && std::mem::discriminant(&n.detail) == discriminant)
        {
            return existing.id.clone();
        }
        self.add(label, kind, detail, line, column)
    }

    pub fn nodes(&self) -> &[DfdNode] {
        &self.nodes
    }

    pub fn find_by_label(&self, label: &str) -> Option<&DfdNode> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&DfdNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn into_nodes(self) -> Vec<DfdNode> {
        self.nodes
    }
}
