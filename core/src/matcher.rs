#![deny(missing_docs)]

//! # Node Matcher
//!
//! Locates the declarations the patcher rewrites. Matching is structural:
//! node kind plus exact (case-sensitive) name, never a text search.
//!
//! A lookup that finds more than one candidate is reported as
//! [`AppError::AmbiguousTarget`] instead of silently picking the first.

use crate::error::{AppError, AppResult};
use crate::syntax::{Node, NodeRef, SourceTree};

/// The minimal argument shape a constructor call must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgShape {
    /// Exact number of arguments.
    pub arity: usize,
    /// Position of the composite literal argument.
    pub literal_at: usize,
}

/// Finds the top-level type spec named `name`.
pub fn find_type_by_name(tree: &SourceTree, name: &str) -> AppResult<Option<NodeRef>> {
    let mut hits = Vec::new();
    for (i, decl) in tree.root().children().iter().enumerate() {
        if decl.kind() != "type_declaration" {
            continue;
        }
        for (j, spec) in decl.children().iter().enumerate() {
            if spec.kind() == "type_spec" && declared_name(spec) == Some(name) {
                hits.push(NodeRef::root().child(i).child(j));
            }
        }
    }
    unique(tree, hits, || format!("type `{}`", name))
}

/// Finds the top-level function or method named `name`.
pub fn find_function_by_name(tree: &SourceTree, name: &str) -> AppResult<Option<NodeRef>> {
    let hits = tree
        .root()
        .children()
        .iter()
        .enumerate()
        .filter(|(_, decl)| {
            matches!(decl.kind(), "function_declaration" | "method_declaration")
                && declared_name(decl) == Some(name)
        })
        .map(|(i, _)| NodeRef::root().child(i))
        .collect();
    unique(tree, hits, || format!("function `{}`", name))
}

/// Finds a call whose callee ends in `constructor` and whose arguments match `shape`.
pub fn find_constructor_call(
    tree: &SourceTree,
    constructor: &str,
    shape: ArgShape,
) -> AppResult<Option<NodeRef>> {
    let hits = tree.find_all(|node| {
        node.kind() == "call_expression"
            && callee_name(node) == Some(constructor)
            && matches_shape(node, shape)
    });
    unique(tree, hits, || format!("call to `{}`", constructor))
}

/// The node whose start decorations document the referenced type spec.
///
/// For `type X struct{}` that is the enclosing `type` declaration; inside a
/// grouped `type ( ... )` block it is the type spec itself.
pub fn decoration_anchor(tree: &SourceTree, r: &NodeRef) -> NodeRef {
    let Some(node) = tree.get(r) else {
        return r.clone();
    };
    if node.kind() != "type_spec" {
        return r.clone();
    }
    match r.parent() {
        Some(parent_ref) => match tree.get(&parent_ref) {
            Some(parent)
                if parent.kind() == "type_declaration"
                    && !parent.children().iter().any(|c| c.token_text() == Some("(")) =>
            {
                parent_ref
            }
            _ => r.clone(),
        },
        None => r.clone(),
    }
}

/// The composite literal argument of a matched call.
pub fn literal_argument<'a>(call: &'a Node, shape: ArgShape) -> Option<&'a Node> {
    let args = call.child_by_field("arguments")?;
    args.named_children()
        .nth(shape.literal_at)
        .filter(|arg| arg.kind() == "composite_literal")
}

fn declared_name(node: &Node) -> Option<&str> {
    node.child_by_field("name").and_then(Node::token_text)
}

fn callee_name(call: &Node) -> Option<&str> {
    let function = call.child_by_field("function")?;
    match function.kind() {
        "identifier" => function.token_text(),
        "selector_expression" => function.child_by_field("field").and_then(Node::token_text),
        _ => None,
    }
}

fn matches_shape(call: &Node, shape: ArgShape) -> bool {
    let arity = call
        .child_by_field("arguments")
        .map(|args| args.named_children().count())
        .unwrap_or(0);
    arity == shape.arity && literal_argument(call, shape).is_some()
}

fn unique(
    tree: &SourceTree,
    mut hits: Vec<NodeRef>,
    what: impl FnOnce() -> String,
) -> AppResult<Option<NodeRef>> {
    match hits.len() {
        0 => Ok(None),
        1 => Ok(hits.pop()),
        n => Err(AppError::AmbiguousTarget(format!(
            "{} matches {} declarations in {}",
            what(),
            n,
            tree.label()
        ))),
    }
}
