//! End-to-end scenarios over serialized component analyses.

use std::collections::HashSet;
use std::io::Write;

use uiflow::{ComponentAnalysis, DfdBuilder, DfdGraph, NodeKind, SubgraphKind};

fn build(json: &str) -> uiflow::DfdSourceData {
    let analysis: ComponentAnalysis = serde_json::from_str(json).expect("valid analysis json");
    DfdBuilder::new().build(&analysis)
}

const COUNTER: &str = r#"{
    "componentName": "Counter",
    "hooks": [{
        "hookName": "useState",
        "variables": ["count", "setCount"],
        "isReadWritePair": true,
        "initialValue": "0"
    }],
    "processes": [{
        "name": "increment",
        "type": "event-handler",
        "references": ["setCount"]
    }],
    "jsxOutput": {
        "structure": {
            "type": "element",
            "tagName": "button",
            "displayDependencies": ["count"],
            "attributeReferences": [
                {"attribute": "onClick", "variable": "increment"}
            ]
        }
    }
}"#;

#[test]
fn simple_counter_produces_three_nodes_and_three_edges() {
    let dfd = build(COUNTER);

    assert_eq!(dfd.nodes.len(), 3);
    let count = dfd.nodes.iter().find(|n| n.label == "count").unwrap();
    assert_eq!(count.kind, NodeKind::DataStore);
    let increment = dfd.nodes.iter().find(|n| n.label == "increment").unwrap();
    assert_eq!(increment.kind, NodeKind::Process);
    let button = dfd.nodes.iter().find(|n| n.label == "<button>").unwrap();

    let triples: HashSet<(String, String, String)> = dfd
        .edges
        .iter()
        .map(|e| (e.from.clone(), e.to.clone(), e.label.to_string()))
        .collect();
    assert!(triples.contains(&(count.id.clone(), button.id.clone(), "display".to_string())));
    assert!(triples.contains(&(button.id.clone(), increment.id.clone(), "onClick".to_string())));
    assert!(triples.contains(&(increment.id.clone(), count.id.clone(), "writes".to_string())));
    assert_eq!(dfd.edges.len(), 3);
}

#[test]
fn empty_conditional_yields_no_subgraphs_or_control_edges() {
    let dfd = build(
        r#"{
        "componentName": "Maybe",
        "hooks": [{
            "hookName": "useState",
            "variables": ["isOpen", "setIsOpen"],
            "isReadWritePair": true
        }],
        "jsxOutput": {
            "structure": {
                "type": "ternary",
                "condition": {"expression": "isOpen", "variables": ["isOpen"]},
                "trueBranch": {
                    "type": "element",
                    "tagName": "fragment",
                    "children": [{"type": "element", "tagName": "div"}]
                }
            }
        }
    }"#,
    );

    let root = dfd.root_subgraph.expect("root always present");
    assert_eq!(root.kind, SubgraphKind::JsxOutput);
    assert!(root.elements.is_empty());
    assert!(!dfd.edges.iter().any(|e| e.label.base == "control visibility"));
}

#[test]
fn identical_input_builds_identically() {
    let first = build(COUNTER);
    let second = build(COUNTER);

    assert_eq!(first.nodes, second.nodes);
    assert_eq!(first.edges, second.edges);
    assert_eq!(first.root_subgraph, second.root_subgraph);
}

#[test]
fn no_duplicate_edges_per_base_label() {
    // A fixture that would naively emit repeated reads/writes: the process
    // references the same state twice and the reducer both ways.
    let dfd = build(
        r#"{
        "componentName": "Cart",
        "hooks": [{
            "hookName": "useReducer",
            "variables": ["cart", "dispatch"],
            "stateProperties": ["items", "total"]
        }],
        "processes": [{
            "name": "checkout",
            "type": "event-handler",
            "references": ["items", "items", "dispatch", "dispatch", "total"]
        }],
        "jsxOutput": {
            "structure": {
                "type": "element",
                "tagName": "div",
                "displayDependencies": ["items", "total"]
            }
        }
    }"#,
    );

    let mut seen = HashSet::new();
    for edge in &dfd.edges {
        assert!(
            seen.insert((edge.from.clone(), edge.to.clone(), edge.label.to_string())),
            "duplicate edge {} -> {} [{}]",
            edge.from,
            edge.to,
            edge.label
        );
    }
    // Property-qualified reads survive per property.
    assert!(dfd
        .edges
        .iter()
        .any(|e| e.label.base == "reads" && e.label.detail.as_deref() == Some("items")));
    assert!(dfd
        .edges
        .iter()
        .any(|e| e.label.base == "reads" && e.label.detail.as_deref() == Some("total")));
}

#[test]
fn unrecognized_hook_takes_generic_path() {
    let dfd = build(
        r#"{
        "componentName": "Shop",
        "hooks": [{
            "hookName": "useCart",
            "variables": ["items", "addItem"],
            "variableTypes": {"items": "data", "addItem": "function"}
        }],
        "processes": [{
            "name": "onBuy",
            "type": "event-handler",
            "references": ["addItem"]
        }]
    }"#,
    );

    assert_eq!(
        dfd.nodes.iter().find(|n| n.label == "items").unwrap().kind,
        NodeKind::DataStore
    );
    assert_eq!(
        dfd.nodes.iter().find(|n| n.label == "addItem").unwrap().kind,
        NodeKind::Process
    );
    assert!(dfd.edges.iter().any(|e| e.label.base == "calls"));
}

#[test]
fn vue_component_normalizes_state_and_emits() {
    let dfd = build(
        r#"{
        "componentName": "Price",
        "processes": [{
            "name": "onApply",
            "type": "event-handler",
            "references": ["applyDiscount"]
        }],
        "metadata": {
            "framework": "vue",
            "refs": [{"name": "quantity", "initialValue": "1"}],
            "computed": [{"name": "total", "dependencies": ["quantity"]}],
            "stores": [{
                "name": "cart",
                "storeName": "useCartStore",
                "writeMethods": ["applyDiscount"]
            }],
            "emits": ["updated"],
            "emitCalls": [{"process": "onApply", "event": "updated"}]
        },
        "jsxOutput": {
            "structure": {
                "type": "element",
                "tagName": "span",
                "displayDependencies": ["total"]
            }
        }
    }"#,
    );

    // quantity and total are data stores; total reads quantity.
    let quantity = dfd.nodes.iter().find(|n| n.label == "quantity").unwrap();
    let total = dfd.nodes.iter().find(|n| n.label == "total").unwrap();
    assert_eq!(quantity.kind, NodeKind::DataStore);
    assert!(dfd
        .edges
        .iter()
        .any(|e| e.from == quantity.id && e.to == total.id && e.label.base == "reads"));

    // The store write method routes a writes edge with the method detail.
    let cart = dfd.nodes.iter().find(|n| n.label == "cart").unwrap();
    assert!(dfd.edges.iter().any(|e| e.to == cart.id
        && e.label.base == "writes"
        && e.label.detail.as_deref() == Some("applyDiscount")));

    // The declared emit gets an output node, an emits edge, and a subgroup.
    let updated = dfd.nodes.iter().find(|n| n.label == "updated").unwrap();
    assert_eq!(updated.kind, NodeKind::ExternalOutput);
    assert!(dfd.edges.iter().any(|e| e.to == updated.id && e.label.base == "emits"));
    assert!(dfd
        .subgraphs
        .iter()
        .any(|sg| sg.kind == SubgraphKind::Emits));
}

#[test]
fn svelte_runes_and_dispatch() {
    let dfd = build(
        r#"{
        "componentName": "Toggle",
        "processes": [{
            "name": "flip",
            "type": "event-handler",
            "references": ["open"]
        }],
        "metadata": {
            "framework": "svelte",
            "runes": [
                {"name": "open", "kind": "state", "initialValue": "false"},
                {"kind": "effect", "references": ["open"]}
            ],
            "dispatches": ["toggled"],
            "dispatchCalls": [{"process": "flip", "event": "toggled"}]
        }
    }"#,
    );

    let open = dfd.nodes.iter().find(|n| n.label == "open").unwrap();
    assert_eq!(open.kind, NodeKind::DataStore);
    let effect = dfd.nodes.iter().find(|n| n.label == "effect 2").unwrap();
    assert_eq!(effect.kind, NodeKind::Process);
    assert!(dfd
        .edges
        .iter()
        .any(|e| e.from == open.id && e.to == effect.id && e.label.base == "reads"));
    assert!(dfd.edges.iter().any(|e| e.label.base == "dispatches"));
    assert!(dfd
        .subgraphs
        .iter()
        .any(|sg| sg.kind == SubgraphKind::Emits && sg.label == "Dispatches"));
}

#[test]
fn exported_ref_handlers_form_a_subgroup() {
    let dfd = build(
        r#"{
        "componentName": "VideoPlayer",
        "processes": [{
            "name": "onPlayClick",
            "type": "event-handler",
            "references": [],
            "externalCalls": [{"callee": "play", "memberOf": "videoRef"}]
        }],
        "jsxOutput": {
            "structure": {
                "type": "element",
                "tagName": "video",
                "attributeReferences": [
                    {"attribute": "ref", "variable": "videoRef"}
                ]
            }
        }
    }"#,
    );

    let handlers = dfd
        .subgraphs
        .iter()
        .find(|sg| sg.kind == SubgraphKind::ExportedHandlers)
        .unwrap();
    assert_eq!(handlers.label, "videoRef");
    assert_eq!(handlers.elements.len(), 1);

    let play = dfd.nodes.iter().find(|n| n.label == "play").unwrap();
    let on_play = dfd.nodes.iter().find(|n| n.label == "onPlayClick").unwrap();
    let video = dfd.nodes.iter().find(|n| n.label == "<video>").unwrap();
    assert!(dfd
        .edges
        .iter()
        .any(|e| e.from == on_play.id && e.to == play.id && e.label.base == "calls"));
    assert!(dfd
        .edges
        .iter()
        .any(|e| e.from == video.id && e.to == handlers.id && e.label.base == "exports"));
}

#[test]
fn analysis_file_round_trips_through_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(COUNTER.as_bytes()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let dfd = build(&text);
    let graph = DfdGraph::from_source(&dfd);

    let stats = graph.stats();
    assert_eq!(stats.data_stores, 1);
    assert_eq!(stats.processes, 2); // increment plus the element node
    assert!(graph
        .dependents("count")
        .iter()
        .any(|d| d.label == "increment" && d.relation == "writes"));
}
