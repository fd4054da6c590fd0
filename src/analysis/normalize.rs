//! Framework adapters: translate per-framework metadata into one
//! normalized state model.
//!
//! React hooks, Vue refs/computed/watchers, and Svelte runes/stores all
//! describe the same handful of dataflow concepts. The node factory and
//! edge builders operate only on this normalized form, so the per-framework
//! differences stay confined to this module.

use tracing::debug;

use super::{ComponentAnalysis, ContextBinding, FrameworkMetadata, RuneKind};

/// What a normalized state record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    /// A mutable reactive value (Vue ref/reactive, Svelte `$state`).
    Reactive,
    /// A value computed from other state (Vue computed, Svelte `$derived`).
    Derived,
    /// A side-effect routine (Vue watcher, Svelte `$effect`).
    Effect,
    /// An external store subscription (Pinia, Svelte store).
    Store,
}

/// One framework state declaration in normalized form.
#[derive(Debug, Clone)]
pub struct NormalizedState {
    pub name: String,
    pub kind: StateKind,
    /// Concrete-kind tag carried onto the node, e.g. `vue-computed`,
    /// `svelte-derived`. Dependency edges key off this later.
    pub source_label: String,
    pub initial_value: Option<String>,
    pub dependencies: Vec<String>,
    /// For effects: variables referenced inside the body.
    pub references: Vec<String>,
    /// Callable members that mutate the value (store actions, `set`).
    pub write_methods: Vec<String>,
    pub line: Option<u32>,
}

/// Declared custom events plus the processes that fire them.
#[derive(Debug, Clone)]
pub struct EventModel {
    /// Edge label verb: `emits` for Vue, `dispatches` for Svelte.
    pub verb: &'static str,
    pub declared: Vec<String>,
    pub calls: Vec<(String, String)>,
}

/// The framework-neutral view the builder passes operate on.
#[derive(Debug, Clone, Default)]
pub struct NormalizedAnalysis {
    pub states: Vec<NormalizedState>,
    pub events: Option<EventModel>,
    pub contexts: Vec<ContextBinding>,
}

/// Translate an analysis' framework metadata into the normalized model.
///
/// Analyses without metadata (plain React components whose state lives in
/// hooks) normalize to an empty record; the hook passes cover them.
pub fn normalize(analysis: &ComponentAnalysis) -> NormalizedAnalysis {
    let Some(metadata) = &analysis.metadata else {
        return NormalizedAnalysis::default();
    };

    let normalized = match metadata {
        FrameworkMetadata::React { context_bindings } => NormalizedAnalysis {
            states: Vec::new(),
            events: None,
            contexts: context_bindings.clone(),
        },
        FrameworkMetadata::Vue {
            refs,
            computed,
            watchers,
            stores,
            emits,
            emit_calls,
        } => {
            let mut states = Vec::new();
            for r in refs {
                states.push(NormalizedState {
                    name: r.name.clone(),
                    kind: StateKind::Reactive,
                    source_label: "vue-ref".to_string(),
                    initial_value: r.initial_value.clone(),
                    dependencies: Vec::new(),
                    references: Vec::new(),
                    write_methods: Vec::new(),
                    line: r.line,
                });
            }
            for c in computed {
                states.push(NormalizedState {
                    name: c.name.clone(),
                    kind: StateKind::Derived,
                    source_label: "vue-computed".to_string(),
                    initial_value: None,
                    dependencies: c.dependencies.clone(),
                    references: Vec::new(),
                    write_methods: Vec::new(),
                    line: c.line,
                });
            }
            for (i, w) in watchers.iter().enumerate() {
                states.push(NormalizedState {
                    name: w
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("watcher {}", i + 1)),
                    kind: StateKind::Effect,
                    source_label: "vue-watcher".to_string(),
                    initial_value: None,
                    dependencies: w.sources.clone(),
                    references: w.references.clone(),
                    write_methods: Vec::new(),
                    line: w.line,
                });
            }
            for s in stores {
                states.push(NormalizedState {
                    name: s.name.clone(),
                    kind: StateKind::Store,
                    source_label: "pinia-store".to_string(),
                    initial_value: None,
                    dependencies: Vec::new(),
                    references: Vec::new(),
                    write_methods: s.write_methods.clone(),
                    line: s.line,
                });
            }
            NormalizedAnalysis {
                states,
                events: event_model("emits", emits, emit_calls),
                contexts: Vec::new(),
            }
        }
        FrameworkMetadata::Svelte {
            runes,
            stores,
            dispatches,
            dispatch_calls,
        } => {
            let mut states = Vec::new();
            for (i, rune) in runes.iter().enumerate() {
                let (kind, tag) = match rune.kind {
                    RuneKind::State => (StateKind::Reactive, "svelte-state"),
                    RuneKind::Derived => (StateKind::Derived, "svelte-derived"),
                    RuneKind::Effect => (StateKind::Effect, "svelte-effect"),
                };
                states.push(NormalizedState {
                    name: rune
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("effect {}", i + 1)),
                    kind,
                    source_label: tag.to_string(),
                    initial_value: rune.initial_value.clone(),
                    dependencies: rune.dependencies.clone(),
                    references: rune.references.clone(),
                    write_methods: Vec::new(),
                    line: rune.line,
                });
            }
            for s in stores {
                states.push(NormalizedState {
                    name: s.name.clone(),
                    kind: StateKind::Store,
                    source_label: "svelte-store".to_string(),
                    initial_value: None,
                    dependencies: Vec::new(),
                    references: Vec::new(),
                    write_methods: s.write_methods.clone(),
                    line: s.line,
                });
            }
            NormalizedAnalysis {
                states,
                events: event_model("dispatches", dispatches, dispatch_calls),
                contexts: Vec::new(),
            }
        }
    };

    debug!(
        states = normalized.states.len(),
        contexts = normalized.contexts.len(),
        has_events = normalized.events.is_some(),
        "normalized framework metadata"
    );
    normalized
}

fn event_model(
    verb: &'static str,
    declared: &[String],
    calls: &[super::EventCall],
) -> Option<EventModel> {
    if declared.is_empty() && calls.is_empty() {
        return None;
    }
    Some(EventModel {
        verb,
        declared: declared.to_vec(),
        calls: calls
            .iter()
            .map(|c| (c.process.clone(), c.event.clone()))
            .collect(),
    })
}
