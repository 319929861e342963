use crate::error::{AppError, AppResult};
use crate::syntax::{Node, NodeRef, SourceTree};

/// Resolves a reference that a matcher produced for this tree.
pub(crate) fn node<'a>(tree: &'a SourceTree, r: &NodeRef) -> AppResult<&'a Node> {
    tree.get(r).ok_or_else(|| stale(tree))
}

/// Mutable variant of [`node`].
pub(crate) fn node_mut<'a>(tree: &'a mut SourceTree, r: &NodeRef) -> AppResult<&'a mut Node> {
    let label = tree.label().to_string();
    tree.get_mut(r)
        .ok_or_else(|| AppError::General(format!("Stale node reference in {}", label)))
}

/// Mutable children of the referenced interior node.
pub(crate) fn children_mut<'a>(
    tree: &'a mut SourceTree,
    r: &NodeRef,
) -> AppResult<&'a mut Vec<Node>> {
    let label = tree.label().to_string();
    node_mut(tree, r)?
        .children_mut()
        .ok_or_else(|| AppError::General(format!("Expected an interior node in {}", label)))
}

fn stale(tree: &SourceTree) -> AppError {
    AppError::General(format!("Stale node reference in {}", tree.label()))
}

/// Whether `node` is the anonymous token `text`.
pub(crate) fn is_token(node: &Node, text: &str) -> bool {
    !node.is_named() && node.token_text() == Some(text)
}

/// Whether `node` is a statement terminator (newline or semicolon).
pub(crate) fn is_terminator(node: &Node) -> bool {
    is_token(node, "\n") || is_token(node, ";")
}

/// Indentation of the first child of `list` that starts on its own line.
pub(crate) fn detect_indent(list: &Node, kind: &str) -> Option<String> {
    list.children()
        .iter()
        .filter(|c| c.kind() == kind)
        .find_map(|c| c.decs.indent())
        .map(str::to_string)
}
