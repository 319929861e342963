//! # Go Parser
//!
//! Runs `tree-sitter-go` over the source and lifts the concrete syntax tree
//! into the owned decorated tree. Comments (grammar extras) and the
//! whitespace between tokens are attached to the next sibling as start
//! decorations; whatever trails the last child becomes the parent's end
//! decorations.

use crate::error::{AppError, AppResult};
use crate::syntax::tree::{Body, Decoration, Decorations, Node, SourceTree};
use tree_sitter::{Node as TsNode, Parser};

/// Parses Go source text. Fails on any syntax error.
pub fn parse(text: &str) -> AppResult<SourceTree> {
    parse_labeled("<source>", text)
}

/// Parses Go source text, naming `label` in any error.
pub fn parse_labeled(label: &str, text: &str) -> AppResult<SourceTree> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| AppError::General(format!("Failed to load Go grammar: {}", e)))?;

    let tree = parser
        .parse(text, None)
        .ok_or_else(|| AppError::parse(label, "parser produced no tree"))?;
    let root = tree.root_node();

    if root.has_error() {
        let message = first_error(root)
            .map(|n| describe_error(n, text))
            .unwrap_or_else(|| "syntax error".to_string());
        return Err(AppError::parse(label, message));
    }

    let node = lift(root, None, text, Decorations::default(), 0, text.len());
    Ok(SourceTree::new(label, text, node))
}

fn lift(
    ts: TsNode,
    field: Option<&str>,
    src: &str,
    mut decs: Decorations,
    start: usize,
    end: usize,
) -> Node {
    if ts.child_count() == 0 {
        let text = src.get(start..end).unwrap_or_default().to_string();
        return Node::parsed(ts.kind(), field, ts.is_named(), decs, Body::Token(text), start..end);
    }

    let mut children = Vec::new();
    let mut pending = Vec::new();
    let mut pos = start;

    let mut cursor = ts.walk();
    if cursor.goto_first_child() {
        loop {
            let child = cursor.node();
            let child_field = cursor.field_name();
            push_gap(&mut pending, src, pos, child.start_byte());

            if child.is_extra() {
                let text = src.get(child.byte_range()).unwrap_or_default();
                pending.push(Decoration::Comment(text.to_string()));
            } else {
                let lead = Decorations {
                    start: std::mem::take(&mut pending),
                    end: Vec::new(),
                };
                children.push(lift(
                    child,
                    child_field,
                    src,
                    lead,
                    child.start_byte(),
                    child.end_byte(),
                ));
            }
            pos = pos.max(child.end_byte());

            if !cursor.goto_next_sibling() {
                break;
            }
        }
    }
    push_gap(&mut pending, src, pos, end);
    decs.end = pending;

    Node::parsed(ts.kind(), field, ts.is_named(), decs, Body::Children(children), start..end)
}

fn push_gap(pending: &mut Vec<Decoration>, src: &str, from: usize, to: usize) {
    if to <= from {
        return;
    }
    if let Some(gap) = src.get(from..to) {
        pending.push(Decoration::Space(gap.to_string()));
    }
}

fn first_error(node: TsNode) -> Option<TsNode> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<TsNode> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn describe_error(node: TsNode, src: &str) -> String {
    let pos = node.start_position();
    if node.is_missing() {
        format!(
            "missing `{}` at line {}, column {}",
            node.kind(),
            pos.row + 1,
            pos.column + 1
        )
    } else {
        let snippet: String = src
            .get(node.byte_range())
            .unwrap_or_default()
            .chars()
            .take(24)
            .collect();
        format!(
            "unexpected `{}` at line {}, column {}",
            snippet.trim(),
            pos.row + 1,
            pos.column + 1
        )
    }
}
