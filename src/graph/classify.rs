//! Variable classification: does a name denote callable behavior or data?
//!
//! Used by the attribute and inline-handler edge passes to pick edge
//! direction: a function-classified variable means the element calls it,
//! a data-classified variable means the source displays/binds into the
//! element. Pure decision logic, no side effects.

use super::types::{DfdNode, NodeDetail, NodeKind};

/// The outcome of classifying a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarRole {
    Function,
    Data,
}

/// Classify a variable by name, optional type text, and the node it
/// resolved to. Checks run in a fixed order; the first match wins.
pub fn classify_variable(
    name: &str,
    type_hint: Option<&str>,
    node: Option<&DfdNode>,
) -> VarRole {
    if let Some(node) = node {
        // Explicit function flags on the node itself.
        match &node.detail {
            NodeDetail::Prop { is_function: true } => return VarRole::Function,
            NodeDetail::ContextFunction { .. } | NodeDetail::CustomHookFunction { .. } => {
                return VarRole::Function
            }
            _ => {}
        }
        if node.kind == NodeKind::Process {
            return VarRole::Function;
        }
        // Write/setter bindings and recorded write-method names.
        match &node.detail {
            NodeDetail::State { write_var, .. } => {
                if write_var.as_deref() == Some(name) {
                    return VarRole::Function;
                }
            }
            NodeDetail::Reducer { dispatch_var, .. } => {
                if dispatch_var == name {
                    return VarRole::Function;
                }
            }
            NodeDetail::FrameworkState { write_methods, .. } => {
                if write_methods.iter().any(|m| m == name) {
                    return VarRole::Function;
                }
            }
            NodeDetail::LibraryHook {
                data_properties,
                process_properties,
                ..
            } => {
                if process_properties.iter().any(|p| p == name) {
                    return VarRole::Function;
                }
                if data_properties.iter().any(|p| p == name) {
                    return VarRole::Data;
                }
            }
            _ => {}
        }
    }

    if let Some(type_text) = type_hint {
        if let Some(role) = classify_type_string(type_text) {
            return role;
        }
    }

    if has_handler_prefix(name) {
        return VarRole::Function;
    }

    VarRole::Data
}

/// Structural analysis of a type annotation's text. Returns `None` when
/// the text gives no signal either way.
pub fn classify_type_string(type_text: &str) -> Option<VarRole> {
    let trimmed = type_text.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Unions: function iff every non-null/undefined member is a function.
    let members = split_top_level_union(trimmed);
    if members.len() > 1 {
        let mut saw_function = false;
        for member in &members {
            let m = member.trim();
            if m == "null" || m == "undefined" {
                continue;
            }
            match classify_type_string(m) {
                Some(VarRole::Function) => saw_function = true,
                _ => return Some(VarRole::Data),
            }
        }
        return if saw_function {
            Some(VarRole::Function)
        } else {
            None
        };
    }

    if is_function_syntax(trimmed) {
        return Some(VarRole::Function);
    }
    if trimmed == "Function" {
        return Some(VarRole::Function);
    }
    if is_named_handler_type(trimmed) {
        return Some(VarRole::Function);
    }
    if is_framework_callable(trimmed) {
        return Some(VarRole::Function);
    }

    Some(VarRole::Data)
}

/// Arrow-function or `function(...)`-keyword syntax.
fn is_function_syntax(t: &str) -> bool {
    if t.starts_with("function") {
        return true;
    }
    // Arrow appears at top level, not inside generic args of a data type
    // like `Array<() => void>`.
    let mut depth = 0usize;
    let bytes = t.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' | b'[' | b'{' => {
                // A leading paren is part of the arrow signature itself.
                if bytes[i] == b'(' && depth == 0 && i == 0 {
                    i += 1;
                    continue;
                }
                depth += 1;
            }
            b'>' if i > 0 && bytes[i - 1] == b'=' => {
                if depth == 0 {
                    return true;
                }
            }
            b'>' | b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    false
}

/// Named event-handler type patterns: `*Handler`, `*Callback`, and the
/// React synthetic handler family.
fn is_named_handler_type(t: &str) -> bool {
    let head = t.split('<').next().unwrap_or(t);
    head.ends_with("Handler") || head.ends_with("Callback") || head == "EventHandler"
}

/// Framework callable shapes: dispatchers, emit functions, ref callbacks.
fn is_framework_callable(t: &str) -> bool {
    let head = t.split('<').next().unwrap_or(t);
    matches!(
        head,
        "Dispatch" | "EmitFn" | "EventDispatcher" | "RefCallback"
    )
}

/// Naming-pattern fallback: `on*`, `handle*`, `set*` with a camel hump.
fn has_handler_prefix(name: &str) -> bool {
    for prefix in ["on", "handle", "set"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.chars().next().is_some_and(|c| c.is_uppercase()) {
                return true;
            }
        }
    }
    false
}

/// Split a type string on `|` at nesting depth zero.
fn split_top_level_union(t: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in t.char_indices() {
        match c {
            '<' | '(' | '[' | '{' => depth += 1,
            '>' | ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                parts.push(&t[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&t[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::NodeArena;

    fn node(label: &str, kind: NodeKind, detail: NodeDetail) -> DfdNode {
        let mut arena = NodeArena::new();
        let id = arena.add(label, kind, detail, None, None);
        arena.find_by_id(&id).unwrap().clone()
    }

    #[test]
    fn process_node_is_function() {
        let n = node(
            "increment",
            NodeKind::Process,
            NodeDetail::Process { is_cleanup: false },
        );
        assert_eq!(
            classify_variable("increment", None, Some(&n)),
            VarRole::Function
        );
    }

    #[test]
    fn write_binding_is_function_read_binding_is_data() {
        let n = node(
            "count",
            NodeKind::DataStore,
            NodeDetail::State {
                read_var: "count".to_string(),
                write_var: Some("setCount".to_string()),
                initial_value: None,
            },
        );
        assert_eq!(
            classify_variable("setCount", None, Some(&n)),
            VarRole::Function
        );
        assert_eq!(classify_variable("count", None, Some(&n)), VarRole::Data);
    }

    #[test]
    fn library_hook_property_lists_decide() {
        let n = node(
            "form",
            NodeKind::DataStore,
            NodeDetail::LibraryHook {
                library: "react-hook-form".to_string(),
                data_properties: vec!["errors".to_string()],
                process_properties: vec!["register".to_string()],
            },
        );
        assert_eq!(
            classify_variable("register", None, Some(&n)),
            VarRole::Function
        );
        assert_eq!(classify_variable("errors", None, Some(&n)), VarRole::Data);
    }

    #[test]
    fn union_types_require_all_function_members() {
        assert_eq!(
            classify_type_string("(() => void) | null | undefined"),
            Some(VarRole::Function)
        );
        assert_eq!(
            classify_type_string("string | (() => void)"),
            Some(VarRole::Data)
        );
    }

    #[test]
    fn arrow_and_function_keyword_syntax() {
        assert_eq!(
            classify_type_string("(e: MouseEvent) => void"),
            Some(VarRole::Function)
        );
        assert_eq!(
            classify_type_string("function(x: number): void"),
            Some(VarRole::Function)
        );
        assert_eq!(classify_type_string("Function"), Some(VarRole::Function));
        // Arrow nested in a generic argument does not make the type callable.
        assert_eq!(
            classify_type_string("Array<() => void>"),
            Some(VarRole::Data)
        );
    }

    #[test]
    fn named_handler_and_framework_callable_types() {
        assert_eq!(
            classify_type_string("MouseEventHandler<HTMLButtonElement>"),
            Some(VarRole::Function)
        );
        assert_eq!(
            classify_type_string("Dispatch<SetStateAction<number>>"),
            Some(VarRole::Function)
        );
        assert_eq!(classify_type_string("string"), Some(VarRole::Data));
    }

    #[test]
    fn naming_prefix_fallback() {
        assert_eq!(classify_variable("onClick", None, None), VarRole::Function);
        assert_eq!(
            classify_variable("handleSubmit", None, None),
            VarRole::Function
        );
        assert_eq!(classify_variable("setTitle", None, None), VarRole::Function);
        // Prefix without a camel hump stays data.
        assert_eq!(classify_variable("online", None, None), VarRole::Data);
        assert_eq!(classify_variable("settings", None, None), VarRole::Data);
        assert_eq!(classify_variable("count", None, None), VarRole::Data);
    }
}
