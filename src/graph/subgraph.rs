//! Subgraph construction from the JSX/template structure tree.
//!
//! Walks element and branch records into a nested subgraph tree. Elements
//! without any display dependency or attribute reference are elided and
//! their children spliced into the parent's position; branches become
//! conditional or loop subgraphs labeled with their condition expression;
//! subgraphs that end up empty are pruned (the root is always kept).

use tracing::warn;

use crate::analysis::{AttributeRef, BranchKind, BranchNode, Condition, ElementNode, StructureNode};

use super::types::{DfdSubgraph, NodeArena, NodeDetail, NodeKind, SubgraphElement, SubgraphKind};

/// Recursion ceiling over caller-supplied structure trees. Input nested
/// deeper than this is truncated with a warning rather than recursed into.
pub const MAX_STRUCTURE_DEPTH: usize = 64;

/// An element node placed into the graph, with the dataflow facts the
/// edge passes need to connect it.
#[derive(Debug, Clone)]
pub struct PlacedElement {
    pub node_id: String,
    pub display_dependencies: Vec<String>,
    pub attribute_references: Vec<AttributeRef>,
}

/// The result of building the structure tree.
#[derive(Debug)]
pub struct SubgraphOutcome {
    pub root: DfdSubgraph,
    pub placed: Vec<PlacedElement>,
    /// Last id issued, so side subgroups can continue the sequence.
    pub subgraph_counter: u32,
}

/// Builds the nested subgraph tree for one component's rendered output.
///
/// Subgraph ids count up from a fresh counter per builder, and element
/// node ids come from the shared arena, so output is deterministic for a
/// given input tree.
pub struct SubgraphBuilder<'a> {
    arena: &'a mut NodeArena,
    counter: u32,
    placed: Vec<PlacedElement>,
}

impl<'a> SubgraphBuilder<'a> {
    pub fn new(arena: &'a mut NodeArena) -> Self {
        Self {
            arena,
            counter: 0,
            placed: Vec::new(),
        }
    }

    /// Build the root `jsx-output` subgraph for a structure tree.
    pub fn build_root(mut self, structure: &StructureNode) -> SubgraphOutcome {
        let mut root = self.new_subgraph("JSX Output", SubgraphKind::JsxOutput, None);
        let mut elements = Vec::new();
        self.collect(structure, &mut elements, 0);
        root.elements = elements;
        prune_empty_subgraphs(&mut root);
        SubgraphOutcome {
            root,
            placed: self.placed,
            subgraph_counter: self.counter,
        }
    }

    fn new_subgraph(
        &mut self,
        label: impl Into<String>,
        kind: SubgraphKind,
        condition: Option<Condition>,
    ) -> DfdSubgraph {
        self.counter += 1;
        DfdSubgraph {
            id: format!("subgraph_{}", self.counter),
            label: label.into(),
            kind,
            elements: Vec::new(),
            condition,
        }
    }

    fn collect(&mut self, node: &StructureNode, out: &mut Vec<SubgraphElement>, depth: usize) {
        if depth > MAX_STRUCTURE_DEPTH {
            warn!(depth, "structure tree exceeds depth ceiling, truncating");
            return;
        }
        if let StructureNode::Element(el) = node {
            self.collect_element(el, out, depth);
        } else if let Some((kind, branch)) = node.branch() {
            self.collect_branch(kind, branch, out, depth);
        }
    }

    fn collect_element(
        &mut self,
        el: &ElementNode,
        out: &mut Vec<SubgraphElement>,
        depth: usize,
    ) {
        if el.has_dependencies() {
            let id = self.place_element(el);
            out.push(SubgraphElement::Node(id));
        }
        // Children always land in the same subgraph; only branches nest.
        // When the element itself was skipped this splices the children
        // into the parent's position (wrapper elision).
        for child in &el.children {
            self.collect(child, out, depth + 1);
        }
    }

    fn collect_branch(
        &mut self,
        kind: BranchKind,
        branch: &BranchNode,
        out: &mut Vec<SubgraphElement>,
        depth: usize,
    ) {
        let expr = branch.condition.expression.clone();
        match kind {
            BranchKind::Ternary => {
                if let Some(true_branch) = &branch.true_branch {
                    if let Some(sg) = self.build_branch_subgraph(
                        true_branch,
                        format!("{{{expr}}}"),
                        SubgraphKind::Conditional,
                        branch.condition.clone(),
                        depth,
                    ) {
                        out.push(SubgraphElement::Nested(sg));
                    }
                }
                if let Some(false_branch) = &branch.false_branch {
                    if let Some(sg) = self.build_branch_subgraph(
                        false_branch,
                        format!("{{!{expr}}}"),
                        SubgraphKind::Conditional,
                        branch.condition.clone(),
                        depth,
                    ) {
                        out.push(SubgraphElement::Nested(sg));
                    }
                }
            }
            BranchKind::LogicalAnd | BranchKind::EarlyReturn => {
                if let Some(true_branch) = &branch.true_branch {
                    if let Some(sg) = self.build_branch_subgraph(
                        true_branch,
                        format!("{{{expr}}}"),
                        SubgraphKind::Conditional,
                        branch.condition.clone(),
                        depth,
                    ) {
                        out.push(SubgraphElement::Nested(sg));
                    }
                }
            }
            BranchKind::LogicalOr => {
                // The "or" fallback path renders when the condition is falsy.
                if let Some(false_branch) = &branch.false_branch {
                    if let Some(sg) = self.build_branch_subgraph(
                        false_branch,
                        format!("{{{expr}}}"),
                        SubgraphKind::Conditional,
                        branch.condition.clone(),
                        depth,
                    ) {
                        out.push(SubgraphElement::Nested(sg));
                    }
                }
            }
            BranchKind::Loop => {
                let mut condition = branch.condition.clone();
                let mut content = branch.true_branch.as_deref();
                // Directly nested loops with no intervening content merge
                // into one loop subgraph.
                while let Some(StructureNode::Loop(inner)) = content {
                    for var in &inner.condition.variables {
                        if !condition.variables.contains(var) {
                            condition.variables.push(var.clone());
                        }
                    }
                    content = inner.true_branch.as_deref();
                }
                if let Some(content) = content {
                    if let Some(sg) = self.build_branch_subgraph(
                        content,
                        "{loop}",
                        SubgraphKind::Loop,
                        condition,
                        depth,
                    ) {
                        out.push(SubgraphElement::Nested(sg));
                    }
                }
            }
        }
    }

    /// Build one branch's subgraph; `None` when nothing qualifies even
    /// after the force-include retry.
    fn build_branch_subgraph(
        &mut self,
        content: &StructureNode,
        label: impl Into<String>,
        kind: SubgraphKind,
        condition: Condition,
        depth: usize,
    ) -> Option<DfdSubgraph> {
        let mut sg = self.new_subgraph(label, kind, Some(condition));
        let mut elements = Vec::new();
        self.collect(content, &mut elements, depth + 1);
        sg.elements = elements;

        if sg.elements.is_empty() {
            // Retry with the branch's single top-level element included
            // regardless of dependencies, so the branch is not silently
            // dropped. Fragments stay elidable.
            if let StructureNode::Element(el) = content {
                if !el.is_fragment() {
                    let id = self.place_element(el);
                    sg.elements.push(SubgraphElement::Node(id));
                }
            }
        }

        if sg.elements.is_empty() {
            None
        } else {
            Some(sg)
        }
    }

    fn place_element(&mut self, el: &ElementNode) -> String {
        let id = self.arena.add(
            format!("<{}>", el.tag_name),
            NodeKind::Process,
            NodeDetail::Element {
                tag_name: el.tag_name.clone(),
            },
            el.line,
            el.column,
        );
        self.placed.push(PlacedElement {
            node_id: id.clone(),
            display_dependencies: el.display_dependencies.clone(),
            attribute_references: el.attribute_references.clone(),
        });
        id
    }
}

/// Recursively drop nested subgraphs with zero elements. The root is
/// retained even when empty.
fn prune_empty_subgraphs(subgraph: &mut DfdSubgraph) {
    for element in subgraph.elements.iter_mut() {
        if let SubgraphElement::Nested(nested) = element {
            prune_empty_subgraphs(nested);
        }
    }
    subgraph
        .elements
        .retain(|e| !matches!(e, SubgraphElement::Nested(nested) if nested.elements.is_empty()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(tag: &str, deps: &[&str], children: Vec<StructureNode>) -> StructureNode {
        StructureNode::Element(ElementNode {
            tag_name: tag.to_string(),
            children,
            display_dependencies: deps.iter().map(|s| s.to_string()).collect(),
            attribute_references: vec![],
            line: None,
            column: None,
        })
    }

    fn condition(expr: &str, vars: &[&str]) -> Condition {
        Condition {
            expression: expr.to_string(),
            variables: vars.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn build(structure: &StructureNode) -> (SubgraphOutcome, NodeArena) {
        let mut arena = NodeArena::new();
        let outcome = SubgraphBuilder::new(&mut arena).build_root(structure);
        (outcome, arena)
    }

    #[test]
    fn wrapper_without_dependencies_is_elided() {
        let tree = element(
            "div",
            &[],
            vec![element("span", &["count"], vec![]), element("p", &[], vec![])],
        );
        let (outcome, arena) = build(&tree);

        // Only the span qualifies; div and p are skipped.
        assert_eq!(outcome.root.elements.len(), 1);
        assert_eq!(arena.nodes().len(), 1);
        assert_eq!(arena.nodes()[0].label, "<span>");
    }

    #[test]
    fn ternary_with_both_arms_yields_two_sibling_subgraphs() {
        let tree = StructureNode::Ternary(BranchNode {
            condition: condition("isOpen", &["isOpen"]),
            true_branch: Some(Box::new(element("div", &["message"], vec![]))),
            false_branch: Some(Box::new(element("span", &["fallback"], vec![]))),
        });
        let (outcome, _) = build(&tree);

        assert_eq!(outcome.root.elements.len(), 2);
        let labels: Vec<&str> = outcome
            .root
            .elements
            .iter()
            .filter_map(|e| match e {
                SubgraphElement::Nested(sg) => Some(sg.label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["{isOpen}", "{!isOpen}"]);
    }

    #[test]
    fn empty_fragment_branches_are_filtered() {
        let tree = StructureNode::Ternary(BranchNode {
            condition: condition("isOpen", &["isOpen"]),
            true_branch: Some(Box::new(element(
                "fragment",
                &[],
                vec![element("div", &[], vec![])],
            ))),
            false_branch: None,
        });
        let (outcome, arena) = build(&tree);

        assert!(outcome.root.elements.is_empty());
        assert!(arena.nodes().is_empty());
    }

    #[test]
    fn dependency_free_branch_force_includes_single_element() {
        let tree = StructureNode::LogicalAnd(BranchNode {
            condition: condition("visible", &["visible"]),
            true_branch: Some(Box::new(element("img", &[], vec![]))),
            false_branch: None,
        });
        let (outcome, arena) = build(&tree);

        assert_eq!(outcome.root.elements.len(), 1);
        match &outcome.root.elements[0] {
            SubgraphElement::Nested(sg) => {
                assert_eq!(sg.kind, SubgraphKind::Conditional);
                assert_eq!(sg.elements.len(), 1);
            }
            _ => panic!("expected nested subgraph"),
        }
        assert_eq!(arena.nodes()[0].label, "<img>");
    }

    #[test]
    fn logical_or_uses_false_branch() {
        let tree = StructureNode::LogicalOr(BranchNode {
            condition: condition("data", &["data"]),
            true_branch: None,
            false_branch: Some(Box::new(element("div", &["placeholder"], vec![]))),
        });
        let (outcome, _) = build(&tree);
        assert_eq!(outcome.root.elements.len(), 1);
        match &outcome.root.elements[0] {
            SubgraphElement::Nested(sg) => assert_eq!(sg.label, "{data}"),
            _ => panic!("expected nested subgraph"),
        }
    }

    #[test]
    fn directly_nested_loops_merge() {
        let inner = StructureNode::Loop(BranchNode {
            condition: condition("row.cells", &["row"]),
            true_branch: Some(Box::new(element("td", &["cell"], vec![]))),
            false_branch: None,
        });
        let tree = StructureNode::Loop(BranchNode {
            condition: condition("rows", &["rows"]),
            true_branch: Some(Box::new(inner)),
            false_branch: None,
        });
        let (outcome, _) = build(&tree);

        assert_eq!(outcome.root.elements.len(), 1);
        match &outcome.root.elements[0] {
            SubgraphElement::Nested(sg) => {
                assert_eq!(sg.kind, SubgraphKind::Loop);
                assert_eq!(sg.label, "{loop}");
                let cond = sg.condition.as_ref().unwrap();
                assert_eq!(cond.variables, vec!["rows", "row"]);
                // No nested loop subgraph survives.
                assert_eq!(sg.iter_subgraphs().len(), 1);
            }
            _ => panic!("expected nested subgraph"),
        }
    }

    #[test]
    fn subgraph_ids_are_deterministic() {
        let tree = StructureNode::Ternary(BranchNode {
            condition: condition("a", &["a"]),
            true_branch: Some(Box::new(element("div", &["x"], vec![]))),
            false_branch: Some(Box::new(element("div", &["y"], vec![]))),
        });
        let (first, _) = build(&tree);
        let (second, _) = build(&tree);
        assert_eq!(first.root, second.root);
    }

    #[test]
    fn depth_ceiling_truncates_pathological_nesting() {
        let mut tree = element("span", &["leaf"], vec![]);
        for _ in 0..(MAX_STRUCTURE_DEPTH + 10) {
            tree = element("div", &[], vec![tree]);
        }
        // Must terminate without overflowing; the leaf is beyond the
        // ceiling so nothing is placed.
        let (outcome, _) = build(&tree);
        assert!(outcome.root.elements.is_empty());
    }
}
