//! Edits on the composite literal passed to a constructor call, e.g. the
//! `ctrl.Options{...}` argument of `ctrl.NewManager`.

use crate::codegen::{make_element_value, make_keyed_element};
use crate::error::{AppError, AppResult};
use crate::patcher::common::{children_mut, is_token, node};
use crate::syntax::{Decorations, Node, NodeRef, SourceTree};
use tracing::debug;

/// What to do with a key of the literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralPatch {
    /// Set the key to this value, adding the element if it is missing.
    /// The value uses relative indentation.
    Set(String),
    /// Remove the key if present.
    Remove,
}

/// The effect a [`LiteralPatch`] had.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralOutcome {
    /// An existing element's value was replaced.
    Replaced,
    /// A new element was appended.
    Appended,
    /// An existing element was removed.
    Removed,
    /// Nothing to remove.
    Absent,
}

/// Applies `patch` to `key` of the composite literal that is the
/// `literal_at`-th argument of the call at `call_ref`.
pub fn patch_named_argument_literal(
    tree: &mut SourceTree,
    call_ref: &NodeRef,
    literal_at: usize,
    key: &str,
    patch: LiteralPatch,
) -> AppResult<LiteralOutcome> {
    let body_ref = literal_body(tree, call_ref, literal_at)?;
    let base_indent = tree.line_indent(call_ref);
    let body = node(tree, &body_ref)?;

    let elements: Vec<usize> = body
        .children()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_named())
        .map(|(i, _)| i)
        .collect();
    let existing = elements
        .iter()
        .copied()
        .find(|&i| element_key(&body.children()[i]) == Some(key));
    let element_indent = elements
        .iter()
        .find_map(|&i| body.children()[i].decs.indent())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}\t", base_indent));

    let outcome = match (patch, existing) {
        (LiteralPatch::Set(value), Some(idx)) => {
            let indent = body.children()[idx]
                .decs
                .indent()
                .map(str::to_string)
                .unwrap_or(element_indent);
            let element_ref = body_ref.child(idx);
            let element = node(tree, &element_ref)?;
            let value_idx = element
                .children()
                .iter()
                .rposition(Node::is_named)
                .ok_or_else(|| malformed(tree))?;
            let mut replacement = make_element_value(&value, &indent)?;
            let children = children_mut(tree, &element_ref)?;
            replacement.decs = std::mem::take(&mut children[value_idx].decs);
            children[value_idx] = replacement;
            LiteralOutcome::Replaced
        }
        (LiteralPatch::Set(value), None) => {
            let element = make_keyed_element(key, &value, &element_indent)?;
            let last = elements.last().copied();
            let children = children_mut(tree, &body_ref)?;
            let at = match last {
                Some(last) if children.get(last + 1).is_some_and(|c| is_token(c, ",")) => last + 2,
                Some(last) => {
                    children.insert(last + 1, Node::token(","));
                    last + 2
                }
                None => 1,
            };
            children.insert(at, element);
            children.insert(at + 1, Node::token(","));
            break_closing_brace(children, &base_indent);
            LiteralOutcome::Appended
        }
        (LiteralPatch::Remove, Some(idx)) => {
            let children = children_mut(tree, &body_ref)?;
            if children.get(idx + 1).is_some_and(|c| is_token(c, ",")) {
                children.remove(idx + 1);
                children.remove(idx);
            } else if idx > 0 && is_token(&children[idx - 1], ",") {
                children.remove(idx);
                children.remove(idx - 1);
            } else {
                children.remove(idx);
            }
            LiteralOutcome::Removed
        }
        (LiteralPatch::Remove, None) => LiteralOutcome::Absent,
    };
    debug!(key, ?outcome, file = tree.label(), "Patched literal argument");
    Ok(outcome)
}

fn literal_body(tree: &SourceTree, call_ref: &NodeRef, literal_at: usize) -> AppResult<NodeRef> {
    let call = node(tree, call_ref)?;
    let args_idx = call
        .child_index_by_field("arguments")
        .ok_or_else(|| malformed(tree))?;
    let (arg_idx, literal) = call.children()[args_idx]
        .children()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_named())
        .nth(literal_at)
        .filter(|(_, c)| c.kind() == "composite_literal")
        .ok_or_else(|| {
            AppError::TargetNotFound(format!(
                "argument {} of the call in {} is not a composite literal",
                literal_at,
                tree.label()
            ))
        })?;
    let body_idx = literal
        .child_index_by_field("body")
        .ok_or_else(|| malformed(tree))?;
    Ok(call_ref.child(args_idx).child(arg_idx).child(body_idx))
}

fn element_key(element: &Node) -> Option<&str> {
    if element.kind() != "keyed_element" {
        return None;
    }
    let key = element.named_children().next()?;
    leaf_text(key)
}

fn leaf_text(node: &Node) -> Option<&str> {
    match node.token_text() {
        Some(text) => Some(text),
        None => match node.children() {
            [only] => leaf_text(only),
            _ => None,
        },
    }
}

/// Moves the closing brace onto its own line once the literal spans several.
fn break_closing_brace(children: &mut [Node], indent: &str) {
    if let Some(close) = children.last_mut() {
        let on_own_line = close.decs.start.iter().any(|d| d.text().contains('\n'));
        if !on_own_line && !close.decs.has_comments() {
            close.decs = Decorations::space(format!("\n{}", indent));
        }
    }
}

fn malformed(tree: &SourceTree) -> AppError {
    AppError::General(format!("Unexpected call shape in {}", tree.label()))
}
