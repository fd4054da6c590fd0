//! Input data model for the DFD construction core.
//!
//! A [`ComponentAnalysis`] is produced by an external extraction layer
//! (per-framework parsers that turn JSX/TSX, Vue SFC, or Svelte SFC source
//! into flat fact records). The core consumes these records as-is and never
//! re-parses source text. All types deserialize from the extractor's
//! camelCase JSON wire shape.

pub mod normalize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use normalize::{normalize, EventModel, NormalizedAnalysis, NormalizedState, StateKind};

/// The source framework a component was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    React,
    Vue,
    Svelte,
}

/// Whether an exposed hook/composable value is plain data or callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarKind {
    Data,
    Function,
}

/// Recognized hook categories pre-classified by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookCategory {
    DataFetching,
    StateManagement,
    Form,
    Routing,
    ServerAction,
    Custom,
}

/// A component prop as declared in the component's signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropInfo {
    pub name: String,
    /// Textual type annotation, when the extractor could recover one.
    #[serde(default)]
    pub type_string: Option<String>,
    #[serde(default)]
    pub is_destructured: bool,
    /// Explicit function-type flag from type resolution, when available.
    #[serde(default)]
    pub is_function: Option<bool>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

/// A hook call (or composable/rune equivalent) recorded by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookInfo {
    pub hook_name: String,
    #[serde(default)]
    pub category: Option<HookCategory>,
    /// Variables bound from the hook's return value, in declaration order.
    #[serde(default)]
    pub variables: Vec<String>,
    /// True for getter/setter tuples like `[count, setCount]`.
    #[serde(default)]
    pub is_read_write_pair: bool,
    /// Per-variable data/function classification from the hook's own types.
    #[serde(default)]
    pub variable_types: BTreeMap<String, VarKind>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Textual initial value expression (e.g. a prop name).
    #[serde(default)]
    pub initial_value: Option<String>,
    /// Library adapter enrichment: originating library, if recognized.
    #[serde(default)]
    pub library_name: Option<String>,
    /// Library adapter enrichment: exposed names holding data.
    #[serde(default)]
    pub data_properties: Vec<String>,
    /// Library adapter enrichment: exposed names that are callable.
    #[serde(default)]
    pub process_properties: Vec<String>,
    /// Reducer-shaped hooks: state property names the reducer exposes.
    #[serde(default)]
    pub state_properties: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

/// What kind of routine a process record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessKind {
    EventHandler,
    Effect,
    Callback,
    Lifecycle,
}

/// A call leaving the component's own scope, e.g. `fetch(...)` or
/// `ref.current.focus()` (the latter carries `member_of`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCall {
    pub callee: String,
    /// Set when the call goes through a ref, naming the ref variable.
    #[serde(default)]
    pub member_of: Option<String>,
}

/// An effect's teardown callback and the variables it touches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
}

/// An event handler, effect, or other callable routine in the component.
///
/// Field names follow the extractor's wire shape: the routine kind
/// arrives as `type`, and the extractor's longer spellings
/// (`usedInJSXElement`, `cleanupProcess`) are accepted as aliases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ProcessKind,
    /// Variable names the process body references.
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub external_calls: Vec<ExternalCall>,
    #[serde(default)]
    pub is_inline_handler: bool,
    #[serde(default, alias = "usedInJSXElement")]
    pub used_in_jsx: bool,
    #[serde(default, alias = "cleanupProcess")]
    pub cleanup: Option<CleanupInfo>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// A conditional or loop expression with the variables it references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub expression: String,
    #[serde(default)]
    pub variables: Vec<String>,
}

/// A variable referenced from a JSX/template attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRef {
    /// Attribute or event name, e.g. `onClick`, `value`, `ref`.
    pub attribute: String,
    pub variable: String,
    /// Explicit property qualifier, e.g. `form.errors` recorded as
    /// variable `form`, property `errors`.
    #[serde(default)]
    pub property: Option<String>,
}

/// A rendered element in the JSX/template structure tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag_name: String,
    #[serde(default)]
    pub children: Vec<StructureNode>,
    /// Variables interpolated into the element's text content.
    #[serde(default)]
    pub display_dependencies: Vec<String>,
    #[serde(default)]
    pub attribute_references: Vec<AttributeRef>,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub column: Option<u32>,
}

impl ElementNode {
    /// Fragments group children without rendering anything themselves.
    pub fn is_fragment(&self) -> bool {
        self.tag_name.is_empty() || self.tag_name == "fragment" || self.tag_name == "<>"
    }

    /// Whether any dataflow attaches directly to this element.
    pub fn has_dependencies(&self) -> bool {
        !self.display_dependencies.is_empty() || !self.attribute_references.is_empty()
    }
}

/// A conditional or loop branch in the structure tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchNode {
    pub condition: Condition,
    #[serde(default)]
    pub true_branch: Option<Box<StructureNode>>,
    #[serde(default)]
    pub false_branch: Option<Box<StructureNode>>,
}

/// Discriminates the branch flavors for code that handles them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Ternary,
    LogicalAnd,
    LogicalOr,
    Loop,
    EarlyReturn,
}

/// One node of the JSX/template structure tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StructureNode {
    Element(ElementNode),
    Ternary(BranchNode),
    LogicalAnd(BranchNode),
    LogicalOr(BranchNode),
    Loop(BranchNode),
    EarlyReturn(BranchNode),
}

impl StructureNode {
    /// Branch flavor and payload, or `None` for elements.
    pub fn branch(&self) -> Option<(BranchKind, &BranchNode)> {
        match self {
            StructureNode::Element(_) => None,
            StructureNode::Ternary(b) => Some((BranchKind::Ternary, b)),
            StructureNode::LogicalAnd(b) => Some((BranchKind::LogicalAnd, b)),
            StructureNode::LogicalOr(b) => Some((BranchKind::LogicalOr, b)),
            StructureNode::Loop(b) => Some((BranchKind::Loop, b)),
            StructureNode::EarlyReturn(b) => Some((BranchKind::EarlyReturn, b)),
        }
    }
}

/// The component's rendered output, as recorded by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsxOutput {
    #[serde(default)]
    pub structure: Option<StructureNode>,
    /// Interpolation placeholders the extractor could not attach to an element.
    #[serde(default)]
    pub placeholders: Vec<String>,
}

/// A variable bound from a consumed context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextBinding {
    pub context_name: String,
    pub variable: String,
    pub kind: VarKind,
}

/// A Vue `ref`/`reactive`/`shallowRef` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VueRef {
    pub name: String,
    #[serde(default)]
    pub initial_value: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// A Vue `computed` declaration and the variables it derives from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VueComputed {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// A Vue `watch`/`watchEffect` declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VueWatcher {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sources: Vec<String>,
    /// Variables referenced inside the watcher body.
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// A store subscription (e.g. a Pinia store binding).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreBinding {
    pub name: String,
    #[serde(default)]
    pub store_name: Option<String>,
    /// Callable members that mutate the store, e.g. `set`, `update`, actions.
    #[serde(default)]
    pub write_methods: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// A Svelte rune declaration (`$state`, `$derived`, `$effect`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuneInfo {
    #[serde(default)]
    pub name: Option<String>,
    pub kind: RuneKind,
    #[serde(default)]
    pub initial_value: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Variables referenced inside an effect rune's body.
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

/// The rune flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuneKind {
    State,
    Derived,
    Effect,
}

/// A declared custom event and the processes that fire it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCall {
    /// Name of the process the call appears in.
    pub process: String,
    /// The event name passed to the emit/dispatch call.
    pub event: String,
}

/// Framework-specific extraction facts, one variant per framework.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "framework", rename_all = "lowercase")]
pub enum FrameworkMetadata {
    #[serde(rename_all = "camelCase")]
    React {
        #[serde(default)]
        context_bindings: Vec<ContextBinding>,
    },
    #[serde(rename_all = "camelCase")]
    Vue {
        #[serde(default)]
        refs: Vec<VueRef>,
        #[serde(default)]
        computed: Vec<VueComputed>,
        #[serde(default)]
        watchers: Vec<VueWatcher>,
        #[serde(default)]
        stores: Vec<StoreBinding>,
        #[serde(default)]
        emits: Vec<String>,
        #[serde(default)]
        emit_calls: Vec<EventCall>,
    },
    #[serde(rename_all = "camelCase")]
    Svelte {
        #[serde(default)]
        runes: Vec<RuneInfo>,
        #[serde(default)]
        stores: Vec<StoreBinding>,
        #[serde(default)]
        dispatches: Vec<String>,
        #[serde(default)]
        dispatch_calls: Vec<EventCall>,
    },
}

/// A complete framework-neutral component analysis, ready for DFD building.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentAnalysis {
    pub component_name: String,
    #[serde(default)]
    pub props: Vec<PropInfo>,
    #[serde(default)]
    pub hooks: Vec<HookInfo>,
    #[serde(default)]
    pub processes: Vec<ProcessInfo>,
    #[serde(default)]
    pub jsx_output: Option<JsxOutput>,
    #[serde(default)]
    pub metadata: Option<FrameworkMetadata>,
}
