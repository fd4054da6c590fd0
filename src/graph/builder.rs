//! Graph assembler: one `build` call turns a component analysis into a
//! complete DFD.
//!
//! All per-build state (node arena, subgraph counters, edge collections)
//! is call-scoped, so a builder can be reused across analyses and two
//! builds on identical input produce identical output.

use tracing::{debug, info, warn};

use crate::analysis::{normalize, ComponentAnalysis};

use super::edges;
use super::hooks::{default_processors, HookProcessor};
use super::nodes;
use super::subgraph::SubgraphBuilder;
use super::types::{
    DfdSourceData, DfdSubgraph, NodeArena, SubgraphElement, SubgraphKind,
};

/// Builds DFDs from component analyses.
///
/// Hook handling is strategy-injected: the builder asks its processors in
/// order and the first match wins; an unmatched or failing hook takes the
/// generic fallback path.
pub struct DfdBuilder {
    processors: Vec<Box<dyn HookProcessor>>,
}

impl Default for DfdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DfdBuilder {
    pub fn new() -> Self {
        Self {
            processors: default_processors(),
        }
    }

    pub fn with_processors(processors: Vec<Box<dyn HookProcessor>>) -> Self {
        Self { processors }
    }

    /// Build the DFD for one component analysis.
    ///
    /// Always returns a graph, possibly an incomplete one; problems are
    /// visible only through logging.
    pub fn build(&self, analysis: &ComponentAnalysis) -> DfdSourceData {
        let normalized = normalize(analysis);
        let mut arena = NodeArena::new();

        // Node passes.
        nodes::create_prop_nodes(&analysis.props, &mut arena);
        nodes::create_framework_state_nodes(&normalized.states, &mut arena);
        nodes::create_context_nodes(&normalized.contexts, &mut arena);
        for hook in &analysis.hooks {
            match self.processors.iter().find(|p| p.matches(hook)) {
                Some(processor) => {
                    if let Err(err) = processor.process(hook, &mut arena) {
                        warn!(
                            hook = %hook.hook_name,
                            processor = processor.name(),
                            %err,
                            "hook processor failed, using fallback"
                        );
                        nodes::create_hook_fallback(hook, &mut arena);
                    }
                }
                None => nodes::create_hook_fallback(hook, &mut arena),
            }
        }
        nodes::create_process_nodes(&analysis.processes, &mut arena);
        nodes::create_external_call_nodes(&analysis.processes, &mut arena);
        let event_ids = match &normalized.events {
            Some(events) => nodes::create_event_nodes(&events.declared, &mut arena),
            None => Vec::new(),
        };

        // Rendered-output structure.
        let structure = analysis
            .jsx_output
            .as_ref()
            .and_then(|jsx| jsx.structure.as_ref());
        let (root_subgraph, placed, mut subgraph_counter) = match structure {
            Some(structure) => {
                let outcome = SubgraphBuilder::new(&mut arena).build_root(structure);
                (Some(outcome.root), outcome.placed, outcome.subgraph_counter)
            }
            None => (None, Vec::new(), 0),
        };

        // Edge passes, in fixed order.
        let mut all_edges = Vec::new();
        all_edges.extend(edges::build_read_write_edges(
            &analysis.processes,
            arena.nodes(),
        ));
        all_edges.extend(edges::build_call_edges(&analysis.processes, arena.nodes()));
        all_edges.extend(edges::build_framework_edges(
            &normalized.states,
            arena.nodes(),
        ));
        all_edges.extend(edges::build_display_edges(&placed, arena.nodes()));
        if let Some(root) = &root_subgraph {
            all_edges.extend(edges::build_control_edges(root, arena.nodes()));
            if let Some(jsx) = &analysis.jsx_output {
                all_edges.extend(edges::build_placeholder_edges(
                    &jsx.placeholders,
                    &root.id,
                    arena.nodes(),
                ));
            }
        }
        all_edges.extend(edges::build_initialize_edges(arena.nodes()));
        if let Some(events) = &normalized.events {
            all_edges.extend(edges::build_event_edges(events, arena.nodes()));
        }

        // Side subgroups: exported ref handlers, then declared events.
        let (mut subgraphs, handler_edges) = edges::build_exported_handlers(
            &analysis.processes,
            &placed,
            &mut arena,
            &mut subgraph_counter,
        );
        all_edges.extend(handler_edges);
        if !event_ids.is_empty() {
            subgraph_counter += 1;
            let label = match normalized.events.as_ref().map(|e| e.verb) {
                Some("dispatches") => "Dispatches",
                _ => "Emits",
            };
            subgraphs.push(DfdSubgraph {
                id: format!("subgraph_{subgraph_counter}"),
                label: label.to_string(),
                kind: SubgraphKind::Emits,
                elements: event_ids.into_iter().map(SubgraphElement::Node).collect(),
                condition: None,
            });
        }

        let merged = edges::merge_edges(all_edges);
        debug!(
            component = %analysis.component_name,
            nodes = arena.nodes().len(),
            edges = merged.len(),
            subgraphs = subgraphs.len(),
            "assembled dfd"
        );
        info!(component = %analysis.component_name, "dfd build complete");

        DfdSourceData {
            nodes: arena.into_nodes(),
            edges: merged,
            root_subgraph,
            subgraphs,
        }
    }
}
