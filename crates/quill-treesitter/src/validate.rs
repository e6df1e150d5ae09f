use crate::tree::SyntaxTree;
use quill_core::{Diagnostic, DiagnosticSeverity, Range};
use std::collections::VecDeque;

/// Priority of syntax diagnostics; above [`quill_core::LSP_DIAGNOSTIC_PRIORITY`].
pub const SYNTAX_ERROR_PRIORITY: i32 = 1000;

/// Source tag on syntax diagnostics.
pub const SYNTAX_SOURCE: &str = "syntax";

/// Collect one diagnostic per error or missing node in `tree` and all of its sub-trees.
///
/// Nodes are visited breadth first; subtrees without errors are not descended into.
pub fn validate(tree: &SyntaxTree) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for t in tree.flatten() {
        validate_tree(t, &mut diagnostics);
    }
    diagnostics
}

fn validate_tree(tree: &SyntaxTree, out: &mut Vec<Diagnostic>) {
    let source = tree.source();
    let root = tree.root_node();
    if !root.has_error() {
        return;
    }

    let mut queue = VecDeque::from([root]);
    let mut cursor = root.walk();
    while let Some(node) = queue.pop_front() {
        if node.is_error() || node.is_missing() {
            let range = Range::new(
                source.position(node.start_position()),
                source.position(node.end_position()),
            );
            tracing::trace!(
                language = tree.name(),
                kind = node.kind(),
                %range,
                "syntax error"
            );
            out.push(
                Diagnostic::new(range, DiagnosticSeverity::Error, "Syntax error")
                    .with_source(SYNTAX_SOURCE)
                    .with_priority(SYNTAX_ERROR_PRIORITY),
            );
        }
        queue.extend(
            node.children(&mut cursor)
                .filter(|child| child.has_error() || child.is_missing()),
        );
    }
}
