//! Node creation, one routine per source category.
//!
//! Each routine skips synthetic placeholder variables and never creates a
//! second node for the same (category, label) pair within one build.

use tracing::debug;

use crate::analysis::{
    ContextBinding, HookInfo, NormalizedState, ProcessInfo, PropInfo, StateKind, VarKind,
};

use super::classify::{classify_type_string, VarRole};
use super::types::{NodeArena, NodeDetail, NodeKind};

/// Props whose name shape looks like anything but whose values are known
/// boolean flags; always treated as incoming data.
const BOOLEAN_PROP_NAMES: &[&str] = &[
    "disabled", "checked", "hidden", "open", "required", "readonly", "selected", "loading",
    "visible", "active",
];

/// Create prop nodes, classifying each as incoming data or an
/// event-handler-shaped output the component invokes.
pub fn create_prop_nodes(props: &[PropInfo], arena: &mut NodeArena) {
    for prop in props {
        let is_function = prop_is_function(prop);
        let kind = if is_function {
            NodeKind::ExternalOutput
        } else {
            NodeKind::ExternalInput
        };
        arena.add_unique(
            prop.name.clone(),
            kind,
            NodeDetail::Prop { is_function },
            prop.line,
            prop.column,
        );
    }
}

fn prop_is_function(prop: &PropInfo) -> bool {
    let name = prop.name.as_str();
    if let Some(rest) = name.strip_prefix("on") {
        if rest.chars().next().is_some_and(|c| c.is_uppercase()) {
            return true;
        }
    }
    if BOOLEAN_PROP_NAMES.contains(&name) {
        return false;
    }
    if let Some(type_string) = &prop.type_string {
        if classify_type_string(type_string) == Some(VarRole::Function) {
            return true;
        }
    }
    prop.is_function.unwrap_or(false)
}

/// Create nodes for normalized framework state. Effects become process
/// nodes; everything else is a data store tagged with its concrete kind.
pub fn create_framework_state_nodes(states: &[NormalizedState], arena: &mut NodeArena) {
    for state in states {
        match state.kind {
            StateKind::Effect => {
                arena.add_unique(
                    state.name.clone(),
                    NodeKind::Process,
                    NodeDetail::Process { is_cleanup: false },
                    state.line,
                    None,
                );
            }
            StateKind::Reactive | StateKind::Derived | StateKind::Store => {
                arena.add_unique(
                    state.name.clone(),
                    NodeKind::DataStore,
                    NodeDetail::FrameworkState {
                        state_category: state.source_label.clone(),
                        dependencies: state.dependencies.clone(),
                        initial_value: state.initial_value.clone(),
                        write_methods: state.write_methods.clone(),
                    },
                    state.line,
                    None,
                );
            }
        }
    }
}

/// Create nodes for context bindings: data enters the component, callable
/// bindings are invoked out of it.
pub fn create_context_nodes(contexts: &[ContextBinding], arena: &mut NodeArena) {
    for binding in contexts {
        match binding.kind {
            VarKind::Data => {
                arena.add_unique(
                    binding.variable.clone(),
                    NodeKind::ExternalInput,
                    NodeDetail::ContextData {
                        variable: binding.variable.clone(),
                    },
                    None,
                    None,
                );
            }
            VarKind::Function => {
                arena.add_unique(
                    binding.variable.clone(),
                    NodeKind::ExternalOutput,
                    NodeDetail::ContextFunction {
                        variable: binding.variable.clone(),
                    },
                    None,
                    None,
                );
            }
        }
    }
}

/// Create one process node per declared routine.
pub fn create_process_nodes(processes: &[ProcessInfo], arena: &mut NodeArena) {
    for process in processes {
        arena.add_unique(
            process.name.clone(),
            NodeKind::Process,
            NodeDetail::Process { is_cleanup: false },
            process.line,
            None,
        );
    }
}

/// Create external-entity nodes for calls leaving the component's scope.
/// Ref-member calls are excluded here; the exported-handlers pass groups
/// them separately.
pub fn create_external_call_nodes(processes: &[ProcessInfo], arena: &mut NodeArena) {
    for process in processes {
        for call in &process.external_calls {
            if call.member_of.is_some() {
                continue;
            }
            arena.add_unique(
                call.callee.clone(),
                NodeKind::ExternalOutput,
                NodeDetail::ExternalCall,
                None,
                None,
            );
        }
    }
}

/// Create external-output nodes for declared custom events. Returns the
/// node ids in declaration order for the emits subgroup.
pub fn create_event_nodes(declared: &[String], arena: &mut NodeArena) -> Vec<String> {
    declared
        .iter()
        .map(|event| {
            arena.add_unique(
                event.clone(),
                NodeKind::ExternalOutput,
                NodeDetail::Event,
                None,
                None,
            )
        })
        .collect()
}

/// Generic hook creation, used when no processor matched (or one failed).
///
/// Read-write pairs collapse to one state node, reducer-shaped hooks get
/// a reducer node, context hooks split per binding, and anything else
/// becomes per-value custom-hook nodes.
pub fn create_hook_fallback(hook: &HookInfo, arena: &mut NodeArena) {
    if is_reducer_shaped(hook) {
        let state_var = hook
            .variables
            .first()
            .cloned()
            .unwrap_or_else(|| "state".to_string());
        let dispatch_var = hook
            .variables
            .get(1)
            .cloned()
            .unwrap_or_else(|| "dispatch".to_string());
        arena.add_unique(
            state_var.clone(),
            NodeKind::DataStore,
            NodeDetail::Reducer {
                state_var,
                dispatch_var,
                state_properties: hook.state_properties.clone(),
            },
            hook.line,
            hook.column,
        );
        return;
    }

    if hook.is_read_write_pair {
        let Some(read_var) = hook.variables.first() else {
            debug!(hook = %hook.hook_name, "read-write pair without bindings, skipping");
            return;
        };
        arena.add_unique(
            read_var.clone(),
            NodeKind::DataStore,
            NodeDetail::State {
                read_var: read_var.clone(),
                write_var: hook.variables.get(1).cloned(),
                initial_value: hook.initial_value.clone(),
            },
            hook.line,
            hook.column,
        );
        return;
    }

    if hook.hook_name == "useContext" {
        for variable in &hook.variables {
            let kind = hook
                .variable_types
                .get(variable)
                .copied()
                .unwrap_or(VarKind::Data);
            create_context_nodes(
                &[ContextBinding {
                    context_name: hook.hook_name.clone(),
                    variable: variable.clone(),
                    kind,
                }],
                arena,
            );
        }
        return;
    }

    // Refs carry no dataflow of their own; ref-member calls surface via
    // the exported-handlers pass instead.
    if hook.hook_name == "useRef" {
        debug!(hook = %hook.hook_name, "skipping ref hook");
        return;
    }

    for variable in &hook.variables {
        // Synthetic placeholder bindings, e.g. an ignored tuple slot.
        if variable.starts_with('_') {
            continue;
        }
        match hook.variable_types.get(variable) {
            Some(VarKind::Function) => {
                arena.add_unique(
                    variable.clone(),
                    NodeKind::Process,
                    NodeDetail::CustomHookFunction {
                        hook_name: hook.hook_name.clone(),
                    },
                    hook.line,
                    hook.column,
                );
            }
            _ => {
                arena.add_unique(
                    variable.clone(),
                    NodeKind::DataStore,
                    NodeDetail::CustomHookData {
                        hook_name: hook.hook_name.clone(),
                    },
                    hook.line,
                    hook.column,
                );
            }
        }
    }
}

fn is_reducer_shaped(hook: &HookInfo) -> bool {
    !hook.state_properties.is_empty() || hook.hook_name == "useReducer"
}
