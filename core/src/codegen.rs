#![deny(missing_docs)]

//! # Code Generation
//!
//! Renders synthesized structures as Go source and lifts them into decorated
//! tree nodes ready for insertion.
//!
//! Every fragment is parsed inside a small wrapper file before it is used, so
//! a fragment that is not valid Go is rejected here instead of corrupting the
//! target file. Parsing cannot tell a stray line from an intended one: marker
//! text is kept to a single line by [`crate::synth::markers`].

use crate::error::{AppError, AppResult};
use crate::synth::namespaces::go_quote;
use crate::synth::GoField;
use crate::syntax::{parse_labeled, Node};

const FRAGMENT: &str = "<generated fragment>";

/// Renders a struct field list, braces included.
///
/// `indent` is the indentation of the line holding the `type` keyword.
/// Columns are aligned gofmt-style within each run of fields; a field preceded
/// by marker comments starts a new run.
pub fn render_field_block(fields: &[GoField], indent: &str) -> String {
    let mut out = String::from("{\n");

    for run in runs(fields) {
        let name_width = run.iter().map(|f| f.name.len()).max().unwrap_or(0);
        let type_width = run.iter().map(|f| f.ty.to_string().len()).max().unwrap_or(0);

        for field in run {
            for marker in &field.markers {
                out.push_str(&format!("{}\t{}\n", indent, marker.as_comment()));
            }
            out.push_str(&format!(
                "{}\t{:<nw$} {:<tw$} {}\n",
                indent,
                field.name,
                field.ty.to_string(),
                field.tag(),
                nw = name_width,
                tw = type_width,
            ));
        }
    }

    out.push_str(indent);
    out.push('}');
    out
}

fn runs(fields: &[GoField]) -> Vec<&[GoField]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for (i, field) in fields.iter().enumerate() {
        if i > start && !field.markers.is_empty() {
            runs.push(&fields[start..i]);
            start = i;
        }
    }
    if start < fields.len() {
        runs.push(&fields[start..]);
    }
    runs
}

/// Builds a `field_declaration_list` node for the given fields.
pub fn make_field_list(fields: &[GoField], indent: &str) -> AppResult<Node> {
    let wrapper = format!(
        "package synth\n\ntype Wrapper struct {}\n",
        render_field_block(fields, indent)
    );
    extract(&wrapper, "field_declaration_list")
}

/// Indents every continuation line of `value` by `indent`.
pub fn reindent(value: &str, indent: &str) -> String {
    value.replace('\n', &format!("\n{}", indent))
}

/// Builds a `key: value` element of a composite literal, placed on its own
/// line at `indent`. `value` uses relative indentation (see [`reindent`]).
pub fn make_keyed_element(key: &str, value: &str, indent: &str) -> AppResult<Node> {
    let wrapper = format!(
        "package synth\n\nvar _ = Wrapper{{\n{indent}{key}: {value},\n}}\n",
        indent = indent,
        key = key,
        value = reindent(value, indent),
    );
    extract(&wrapper, "keyed_element")
}

/// Builds the value node of a keyed element (see [`make_keyed_element`]).
pub fn make_element_value(value: &str, indent: &str) -> AppResult<Node> {
    let element = make_keyed_element("Wrapper", value, indent)?;
    element
        .named_children()
        .last()
        .cloned()
        .ok_or_else(|| AppError::General("Internal generation error: element value not found".into()))
}

/// Builds an `import_spec` node for `path`.
pub fn make_import_spec(path: &str) -> AppResult<Node> {
    let wrapper = format!("package synth\n\nimport (\n\t{}\n)\n", go_quote(path));
    extract(&wrapper, "import_spec")
}

/// Builds a standalone `import "path"` declaration.
pub fn make_import_declaration(path: &str) -> AppResult<Node> {
    let wrapper = format!("package synth\n\nimport {}\n", go_quote(path));
    extract(&wrapper, "import_declaration")
}

fn extract(wrapper: &str, kind: &str) -> AppResult<Node> {
    let tree = parse_labeled(FRAGMENT, wrapper)?;
    let found = tree
        .find_all(|n| n.kind() == kind)
        .into_iter()
        .next()
        .and_then(|r| tree.get(&r).cloned())
        .ok_or_else(|| {
            AppError::General(format!("Internal generation error: `{}` node not found", kind))
        })?;
    Ok(found.detach())
}
