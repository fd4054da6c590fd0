//! Variable-to-node resolution.
//!
//! Given a referenced variable name, find the node that represents it.
//! Lookups run through a fixed priority chain: a plain label match always
//! wins over a metadata-based match, so a prop and an unrelated state
//! variable sharing a name resolve to whichever check fires first. That
//! ordering is load-bearing for edge direction downstream; see DESIGN.md
//! for the open question around label collisions.

use super::types::{DfdNode, NodeDetail};

/// Find the node representing `name` in the current node set.
///
/// Returns `None` when nothing matches; callers skip the corresponding
/// edge, which is the normal outcome for variables outside the analyzed
/// scope.
pub fn find_node_by_variable<'a>(name: &str, nodes: &'a [DfdNode]) -> Option<&'a DfdNode> {
    // 1. Exact label match.
    if let Some(n) = nodes.iter().find(|n| n.label == name) {
        return Some(n);
    }
    // 2. Read binding of a read-write pair.
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::State { read_var, .. } if read_var == name)
    }) {
        return Some(n);
    }
    // 3. Write binding of a read-write pair.
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::State { write_var: Some(w), .. } if w == name)
    }) {
        return Some(n);
    }
    // 4. Reducer state-property membership.
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::Reducer { state_properties, .. }
            if state_properties.iter().any(|p| p == name))
    }) {
        return Some(n);
    }
    // 5. Reducer's own bindings (state object or dispatcher).
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::Reducer { state_var, dispatch_var, .. }
            if state_var == name || dispatch_var == name)
    }) {
        return Some(n);
    }
    // 6. Library-hook property membership (data, then process).
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::LibraryHook { data_properties, .. }
            if data_properties.iter().any(|p| p == name))
    }) {
        return Some(n);
    }
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::LibraryHook { process_properties, .. }
            if process_properties.iter().any(|p| p == name))
    }) {
        return Some(n);
    }
    // 7. Framework-state write methods (store actions, setters).
    if let Some(n) = nodes.iter().find(|n| {
        matches!(&n.detail, NodeDetail::FrameworkState { write_methods, .. }
            if write_methods.iter().any(|m| m == name))
    }) {
        return Some(n);
    }
    // 8. Context bindings recorded under a different display label.
    nodes.iter().find(|n| {
        matches!(&n.detail,
            NodeDetail::ContextData { variable } | NodeDetail::ContextFunction { variable }
                if variable == name)
    })
}

/// When a reference hits a multi-property node (reducer or library hook)
/// through one of its properties rather than its label, return that
/// property name for use as an edge-label detail.
pub fn property_detail(name: &str, node: &DfdNode) -> Option<String> {
    if node.label == name {
        return None;
    }
    match &node.detail {
        NodeDetail::Reducer {
            state_properties, ..
        } if state_properties.iter().any(|p| p == name) => Some(name.to_string()),
        NodeDetail::LibraryHook {
            data_properties,
            process_properties,
            ..
        } if data_properties.iter().any(|p| p == name)
            || process_properties.iter().any(|p| p == name) =>
        {
            Some(name.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{NodeArena, NodeKind};

    fn arena_with_fixture() -> NodeArena {
        let mut arena = NodeArena::new();
        arena.add(
            "count",
            NodeKind::DataStore,
            NodeDetail::State {
                read_var: "count".to_string(),
                write_var: Some("setCount".to_string()),
                initial_value: None,
            },
            None,
            None,
        );
        arena.add(
            "form",
            NodeKind::DataStore,
            NodeDetail::Reducer {
                state_var: "formState".to_string(),
                dispatch_var: "dispatch".to_string(),
                state_properties: vec!["email".to_string(), "password".to_string()],
            },
            None,
            None,
        );
        arena.add(
            "query",
            NodeKind::ExternalInput,
            NodeDetail::LibraryHook {
                library: "react-query".to_string(),
                data_properties: vec!["data".to_string(), "isLoading".to_string()],
                process_properties: vec!["refetch".to_string()],
            },
            None,
            None,
        );
        arena.add(
            "theme",
            NodeKind::ExternalInput,
            NodeDetail::ContextData {
                variable: "theme".to_string(),
            },
            None,
            None,
        );
        arena
    }

    #[test]
    fn label_match_wins() {
        let arena = arena_with_fixture();
        let n = find_node_by_variable("count", arena.nodes()).unwrap();
        assert_eq!(n.label, "count");
    }

    #[test]
    fn write_binding_resolves_to_pair_node() {
        let arena = arena_with_fixture();
        let n = find_node_by_variable("setCount", arena.nodes()).unwrap();
        assert_eq!(n.label, "count");
    }

    #[test]
    fn reducer_state_property_resolves() {
        let arena = arena_with_fixture();
        let n = find_node_by_variable("email", arena.nodes()).unwrap();
        assert_eq!(n.label, "form");
        assert_eq!(property_detail("email", n), Some("email".to_string()));
    }

    #[test]
    fn reducer_dispatch_resolves() {
        let arena = arena_with_fixture();
        let n = find_node_by_variable("dispatch", arena.nodes()).unwrap();
        assert_eq!(n.label, "form");
    }

    #[test]
    fn library_hook_properties_resolve() {
        let arena = arena_with_fixture();
        let data = find_node_by_variable("isLoading", arena.nodes()).unwrap();
        assert_eq!(data.label, "query");
        let process = find_node_by_variable("refetch", arena.nodes()).unwrap();
        assert_eq!(process.label, "query");
    }

    #[test]
    fn unknown_variable_is_none() {
        let arena = arena_with_fixture();
        assert!(find_node_by_variable("nothing", arena.nodes()).is_none());
    }

    #[test]
    fn label_collision_prefers_plain_label_over_metadata() {
        let mut arena = arena_with_fixture();
        // A prop that happens to share the name of a reducer property.
        arena.add(
            "email",
            NodeKind::ExternalInput,
            NodeDetail::Prop { is_function: false },
            None,
            None,
        );
        let n = find_node_by_variable("email", arena.nodes()).unwrap();
        assert!(matches!(n.detail, NodeDetail::Prop { .. }));
    }

    #[test]
    fn property_detail_absent_for_label_hits() {
        let arena = arena_with_fixture();
        let n = find_node_by_variable("form", arena.nodes()).unwrap();
        assert_eq!(property_detail("form", n), None);
    }
}
