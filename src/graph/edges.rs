//! Edge construction passes plus the merge pass.
//!
//! Each builder is a pure function over the current node set producing
//! new edges. Builders run in a fixed order; later ones may rely on node
//! categories but never on another builder's edges. A variable that fails
//! to resolve simply yields no edge.

use crate::analysis::{EventModel, NormalizedState, ProcessInfo, StateKind};

use super::classify::{classify_variable, VarRole};
use super::resolve::{find_node_by_variable, property_detail};
use super::subgraph::PlacedElement;
use super::types::{
    DfdEdge, DfdNode, DfdSubgraph, EdgeLabel, NodeArena, NodeDetail, NodeKind, SubgraphElement,
    SubgraphKind,
};

/// How a process's reference relates to the node it resolved to.
enum Relation {
    Read(Option<String>),
    Write(Option<String>),
    Dispatch,
    Call,
}

fn reference_relation(name: &str, node: &DfdNode) -> Relation {
    match &node.detail {
        NodeDetail::State {
            write_var: Some(w), ..
        } if w == name => Relation::Write(None),
        NodeDetail::Reducer { dispatch_var, .. } if dispatch_var == name => Relation::Dispatch,
        NodeDetail::FrameworkState { write_methods, .. }
            if write_methods.iter().any(|m| m == name) =>
        {
            Relation::Write(Some(name.to_string()))
        }
        NodeDetail::LibraryHook {
            process_properties, ..
        } if process_properties.iter().any(|p| p == name) => {
            Relation::Write(property_detail(name, node))
        }
        _ => match classify_variable(name, None, Some(node)) {
            VarRole::Function => Relation::Call,
            VarRole::Data => Relation::Read(property_detail(name, node)),
        },
    }
}

fn node_id(nodes: &[DfdNode], label: &str, kind: NodeKind) -> Option<String> {
    nodes
        .iter()
        .find(|n| n.label == label && n.kind == kind)
        .map(|n| n.id.clone())
}

/// Reads and writes between processes and the state they touch.
///
/// Referencing a state's read binding, a reducer state property, or a
/// library-hook data property reads state into the process; referencing a
/// write/setter binding writes out of it (`dispatch` for reducers).
/// Cleanup callbacks are checked identically against their own reference
/// set, with the resulting edges flagged.
pub fn build_read_write_edges(processes: &[ProcessInfo], nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for process in processes {
        let Some(process_id) = node_id(nodes, &process.name, NodeKind::Process) else {
            continue;
        };
        connect_references(&process_id, &process.references, nodes, false, &mut edges);
        if let Some(cleanup) = &process.cleanup {
            connect_references(&process_id, &cleanup.references, nodes, true, &mut edges);
        }
        // Declared dependencies (effect dependency arrays) read like
        // body references, minus the ones the body already covers.
        for dep in &process.dependencies {
            if process.references.contains(dep) {
                continue;
            }
            let Some(node) = find_node_by_variable(dep, nodes) else {
                continue;
            };
            if node.id == process_id {
                continue;
            }
            if let Relation::Read(detail) = reference_relation(dep, node) {
                edges.push(DfdEdge::new(
                    node.id.clone(),
                    process_id.clone(),
                    EdgeLabel::maybe_detail("reads", detail),
                ));
            }
        }
    }
    edges
}

fn connect_references(
    process_id: &str,
    references: &[String],
    nodes: &[DfdNode],
    is_cleanup: bool,
    edges: &mut Vec<DfdEdge>,
) {
    for reference in references {
        let Some(node) = find_node_by_variable(reference, nodes) else {
            continue;
        };
        if node.id == process_id {
            continue;
        }
        let mut edge = match reference_relation(reference, node) {
            Relation::Read(detail) => DfdEdge::new(
                node.id.clone(),
                process_id,
                EdgeLabel::maybe_detail("reads", detail),
            ),
            Relation::Write(detail) => DfdEdge::new(
                process_id,
                node.id.clone(),
                EdgeLabel::maybe_detail("writes", detail),
            ),
            Relation::Dispatch => {
                DfdEdge::new(process_id, node.id.clone(), EdgeLabel::bare("dispatch"))
            }
            // Call relations belong to the calls pass.
            Relation::Call => continue,
        };
        edge.is_cleanup = is_cleanup;
        edges.push(edge);
    }
}

/// Calls from processes to other processes, context functions, custom-hook
/// functions, function-typed props, and external call targets.
pub fn build_call_edges(processes: &[ProcessInfo], nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for process in processes {
        let Some(process_id) = node_id(nodes, &process.name, NodeKind::Process) else {
            continue;
        };
        for reference in &process.references {
            let Some(node) = find_node_by_variable(reference, nodes) else {
                continue;
            };
            if node.id == process_id {
                continue;
            }
            if matches!(reference_relation(reference, node), Relation::Call) {
                edges.push(DfdEdge::new(
                    process_id.clone(),
                    node.id.clone(),
                    EdgeLabel::bare("calls"),
                ));
            }
        }
        for call in &process.external_calls {
            if call.member_of.is_some() {
                continue;
            }
            if let Some(target) = nodes
                .iter()
                .find(|n| n.label == call.callee && n.detail == NodeDetail::ExternalCall)
            {
                edges.push(DfdEdge::new(
                    process_id.clone(),
                    target.id.clone(),
                    EdgeLabel::bare("calls"),
                ));
            }
        }
    }
    edges
}

/// Dependency edges for normalized framework state: derived values read
/// their sources, effects read their watch sources and touch the state
/// their bodies reference.
pub fn build_framework_edges(states: &[NormalizedState], nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for state in states {
        match state.kind {
            StateKind::Derived => {
                let Some(derived_id) = node_id(nodes, &state.name, NodeKind::DataStore) else {
                    continue;
                };
                for dep in &state.dependencies {
                    let Some(source) = find_node_by_variable(dep, nodes) else {
                        continue;
                    };
                    if source.id == derived_id {
                        continue;
                    }
                    edges.push(DfdEdge::new(
                        source.id.clone(),
                        derived_id.clone(),
                        EdgeLabel::maybe_detail("reads", property_detail(dep, source)),
                    ));
                }
            }
            StateKind::Effect => {
                let Some(effect_id) = node_id(nodes, &state.name, NodeKind::Process) else {
                    continue;
                };
                for dep in &state.dependencies {
                    let Some(source) = find_node_by_variable(dep, nodes) else {
                        continue;
                    };
                    if source.id == effect_id {
                        continue;
                    }
                    edges.push(DfdEdge::new(
                        source.id.clone(),
                        effect_id.clone(),
                        EdgeLabel::maybe_detail("reads", property_detail(dep, source)),
                    ));
                }
                for reference in &state.references {
                    let Some(node) = find_node_by_variable(reference, nodes) else {
                        continue;
                    };
                    if node.id == effect_id {
                        continue;
                    }
                    let edge = match reference_relation(reference, node) {
                        Relation::Read(detail) => DfdEdge::new(
                            node.id.clone(),
                            effect_id.clone(),
                            EdgeLabel::maybe_detail("reads", detail),
                        ),
                        Relation::Write(detail) => DfdEdge::new(
                            effect_id.clone(),
                            node.id.clone(),
                            EdgeLabel::maybe_detail("writes", detail),
                        ),
                        Relation::Dispatch => DfdEdge::new(
                            effect_id.clone(),
                            node.id.clone(),
                            EdgeLabel::bare("dispatch"),
                        ),
                        Relation::Call => DfdEdge::new(
                            effect_id.clone(),
                            node.id.clone(),
                            EdgeLabel::bare("calls"),
                        ),
                    };
                    edges.push(edge);
                }
            }
            StateKind::Reactive | StateKind::Store => {}
        }
    }
    edges
}

/// Display and binding edges between elements and the variables they
/// reference.
///
/// Function-classified attribute variables are invoked by the element, so
/// the edge runs element to source labeled with the attribute name; data
/// flows the other way as `display`/`binds`, property-suffixed when the
/// source is a multi-property node.
pub fn build_display_edges(placed: &[PlacedElement], nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for element in placed {
        for dep in &element.display_dependencies {
            let Some(node) = find_node_by_variable(dep, nodes) else {
                continue;
            };
            edges.push(DfdEdge::new(
                node.id.clone(),
                element.node_id.clone(),
                EdgeLabel::maybe_detail("display", property_detail(dep, node)),
            ));
        }
        for attr in &element.attribute_references {
            // Ref attributes carry the exported-handlers grouping, not a
            // dataflow of their own.
            if attr.attribute == "ref" {
                continue;
            }
            let Some(node) = find_node_by_variable(&attr.variable, nodes) else {
                continue;
            };
            let detail = attr
                .property
                .clone()
                .or_else(|| property_detail(&attr.variable, node));
            match classify_variable(&attr.variable, None, Some(node)) {
                VarRole::Function => edges.push(DfdEdge::new(
                    element.node_id.clone(),
                    node.id.clone(),
                    EdgeLabel::maybe_detail(attr.attribute.clone(), detail),
                )),
                VarRole::Data => edges.push(DfdEdge::new(
                    node.id.clone(),
                    element.node_id.clone(),
                    EdgeLabel::maybe_detail("binds", detail),
                )),
            }
        }
    }
    edges
}

/// Display edges for interpolation placeholders the extractor could not
/// attach to an element; they surface on the root output subgraph.
pub fn build_placeholder_edges(
    placeholders: &[String],
    root_id: &str,
    nodes: &[DfdNode],
) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for placeholder in placeholders {
        let Some(node) = find_node_by_variable(placeholder, nodes) else {
            continue;
        };
        edges.push(DfdEdge::new(
            node.id.clone(),
            root_id,
            EdgeLabel::maybe_detail("display", property_detail(placeholder, node)),
        ));
    }
    edges
}

/// Visibility and iteration edges from condition variables to the
/// subgraphs they gate.
pub fn build_control_edges(root: &DfdSubgraph, nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for sg in root.iter_subgraphs() {
        let Some(condition) = &sg.condition else {
            continue;
        };
        let base = if sg.kind == SubgraphKind::Loop {
            "iterates over"
        } else {
            "control visibility"
        };
        for var in &condition.variables {
            let Some(node) = find_node_by_variable(var, nodes) else {
                continue;
            };
            edges.push(DfdEdge::new(
                node.id.clone(),
                sg.id.clone(),
                EdgeLabel::maybe_detail(base, property_detail(var, node)),
            ));
        }
    }
    edges
}

/// `initializes` edges from props to the state they seed.
pub fn build_initialize_edges(nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for node in nodes {
        let initial = match &node.detail {
            NodeDetail::State {
                initial_value: Some(v),
                ..
            } => v,
            NodeDetail::FrameworkState {
                initial_value: Some(v),
                ..
            } => v,
            _ => continue,
        };
        if let Some(prop) = nodes
            .iter()
            .find(|n| n.label == *initial && matches!(n.detail, NodeDetail::Prop { .. }))
        {
            edges.push(DfdEdge::new(
                prop.id.clone(),
                node.id.clone(),
                EdgeLabel::bare("initializes"),
            ));
        }
    }
    edges
}

/// Emit/dispatch edges from processes to the declared events they fire.
pub fn build_event_edges(events: &EventModel, nodes: &[DfdNode]) -> Vec<DfdEdge> {
    let mut edges = Vec::new();
    for (process, event) in &events.calls {
        let Some(process_id) = node_id(nodes, process, NodeKind::Process) else {
            continue;
        };
        let Some(event_node) = nodes
            .iter()
            .find(|n| n.label == *event && n.detail == NodeDetail::Event)
        else {
            continue;
        };
        edges.push(DfdEdge::new(
            process_id,
            event_node.id.clone(),
            EdgeLabel::bare(events.verb),
        ));
    }
    edges
}

/// Group `ref.current.method(...)` calls by ref name into
/// exported-handlers subgroups.
///
/// Each distinct method becomes a process node inside the subgroup with
/// `calls` edges from every invoking process; an element carrying the ref
/// attribute gets an `exports` edge to the subgroup.
pub fn build_exported_handlers(
    processes: &[ProcessInfo],
    placed: &[PlacedElement],
    arena: &mut NodeArena,
    subgraph_counter: &mut u32,
) -> (Vec<DfdSubgraph>, Vec<DfdEdge>) {
    // (ref name, [(method, [caller process names])]) in first-seen order.
    let mut groups: Vec<(String, Vec<(String, Vec<String>)>)> = Vec::new();
    for process in processes {
        for call in &process.external_calls {
            let Some(ref_name) = &call.member_of else {
                continue;
            };
            let idx = match groups.iter().position(|(name, _)| name == ref_name) {
                Some(i) => i,
                None => {
                    groups.push((ref_name.clone(), Vec::new()));
                    groups.len() - 1
                }
            };
            let group = &mut groups[idx];
            match group.1.iter_mut().find(|(m, _)| *m == call.callee) {
                Some((_, callers)) => {
                    if !callers.contains(&process.name) {
                        callers.push(process.name.clone());
                    }
                }
                None => group.1.push((call.callee.clone(), vec![process.name.clone()])),
            }
        }
    }

    let mut subgraphs = Vec::new();
    let mut edges = Vec::new();
    for (ref_name, methods) in groups {
        *subgraph_counter += 1;
        let mut sg = DfdSubgraph {
            id: format!("subgraph_{subgraph_counter}"),
            label: ref_name.clone(),
            kind: SubgraphKind::ExportedHandlers,
            elements: Vec::new(),
            condition: None,
        };
        for (method, callers) in methods {
            let method_id = arena.add_unique(
                method,
                NodeKind::Process,
                NodeDetail::ExportedHandler {
                    ref_name: ref_name.clone(),
                },
                None,
                None,
            );
            sg.elements.push(SubgraphElement::Node(method_id.clone()));
            for caller in callers {
                if let Some(caller_id) = node_id(arena.nodes(), &caller, NodeKind::Process) {
                    edges.push(DfdEdge::new(
                        caller_id,
                        method_id.clone(),
                        EdgeLabel::bare("calls"),
                    ));
                }
            }
        }
        for element in placed {
            let carries_ref = element
                .attribute_references
                .iter()
                .any(|a| a.attribute == "ref" && a.variable == ref_name);
            if carries_ref {
                edges.push(DfdEdge::new(
                    element.node_id.clone(),
                    sg.id.clone(),
                    EdgeLabel::bare("exports"),
                ));
            }
        }
        subgraphs.push(sg);
    }
    (subgraphs, edges)
}

/// Deduplicate edges per `(from, to)` pair: exact duplicates collapse
/// (flags OR together), and when a bare label coexists with a
/// `label: detail` variant of the same base, only the detailed one is
/// kept. Distinct details all survive.
pub fn merge_edges(edges: Vec<DfdEdge>) -> Vec<DfdEdge> {
    let mut kept: Vec<DfdEdge> = Vec::new();
    for edge in edges {
        if let Some(existing) = kept
            .iter_mut()
            .find(|e| e.from == edge.from && e.to == edge.to && e.label == edge.label)
        {
            existing.is_cleanup |= edge.is_cleanup;
            existing.is_long_arrow |= edge.is_long_arrow;
            continue;
        }
        let same_base_detailed = |e: &DfdEdge| {
            e.from == edge.from
                && e.to == edge.to
                && e.label.base == edge.label.base
                && e.label.detail.is_some()
        };
        if edge.label.detail.is_some() {
            // A specific variant supersedes any bare one already kept.
            kept.retain(|e| {
                !(e.from == edge.from
                    && e.to == edge.to
                    && e.label.base == edge.label.base
                    && e.label.detail.is_none())
            });
            kept.push(edge);
        } else if !kept.iter().any(same_base_detailed) {
            kept.push(edge);
        }
    }
    kept
}
