use crate::codegen::make_field_list;
use crate::error::{AppError, AppResult};
use crate::matcher::decoration_anchor;
use crate::patcher::common::{node, node_mut};
use crate::synth::GoField;
use crate::syntax::{Node, NodeRef, SourceTree};

/// Replaces the field list of the struct type spec at `type_ref`.
///
/// The whole `{ ... }` block is regenerated from `fields`; the type's name,
/// its doc comments and everything outside the braces are kept.
pub fn replace_field_list(
    tree: &mut SourceTree,
    type_ref: &NodeRef,
    fields: &[GoField],
) -> AppResult<()> {
    let indent = tree.line_indent(&decoration_anchor(tree, type_ref));
    let spec = node(tree, type_ref)?;
    let name = spec
        .child_by_field("name")
        .and_then(Node::token_text)
        .unwrap_or_default()
        .to_string();

    let not_a_struct =
        || AppError::General(format!("Type '{}' in {} is not a struct", name, tree.label()));
    let ty_idx = spec.child_index_by_field("type").ok_or_else(not_a_struct)?;
    let struct_ty = &spec.children()[ty_idx];
    if struct_ty.kind() != "struct_type" {
        return Err(not_a_struct());
    }
    let list_idx = struct_ty
        .child_index_by_kind("field_declaration_list")
        .ok_or_else(not_a_struct)?;

    let mut replacement = make_field_list(fields, &indent)?;
    let target = node_mut(tree, &type_ref.child(ty_idx).child(list_idx))?;
    replacement.decs.start = std::mem::take(&mut target.decs.start);
    *target = replacement;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_type_by_name;
    use crate::syntax::parse;
    use crate::type_mapping::GoType;
    use pretty_assertions::assert_eq;

    fn field(name: &str, ty: GoType, json: &str) -> GoField {
        GoField {
            name: name.into(),
            ty,
            json_name: json.into(),
            markers: vec![],
        }
    }

    #[test]
    fn test_replace_scaffold_fields() {
        let src = "package v1\n\n// WidgetSpec is the desired state.\ntype WidgetSpec struct {\n\t// Foo is an example field\n\tFoo string `json:\"foo,omitempty\"`\n}\n\ntype Other struct{}\n";
        let mut tree = parse(src).unwrap();
        let r = find_type_by_name(&tree, "WidgetSpec").unwrap().unwrap();
        replace_field_list(
            &mut tree,
            &r,
            &[
                field("Image", GoType::String, "image"),
                field("Replicas", GoType::Int, "replicas"),
            ],
        )
        .unwrap();
        assert_eq!(
            tree.to_string(),
            "package v1\n\n// WidgetSpec is the desired state.\ntype WidgetSpec struct {\n\tImage    string `json:\"image,omitempty\"`\n\tReplicas int    `json:\"replicas,omitempty\"`\n}\n\ntype Other struct{}\n"
        );
    }

    #[test]
    fn test_replace_inside_grouped_declaration() {
        let src = "package v1\n\ntype (\n\tASpec struct {\n\t\tOld int\n\t}\n)\n";
        let mut tree = parse(src).unwrap();
        let r = find_type_by_name(&tree, "ASpec").unwrap().unwrap();
        replace_field_list(&mut tree, &r, &[field("New", GoType::Bool, "new")]).unwrap();
        assert_eq!(
            tree.to_string(),
            "package v1\n\ntype (\n\tASpec struct {\n\t\tNew bool `json:\"new,omitempty\"`\n\t}\n)\n"
        );
    }

    #[test]
    fn test_empty_properties_clear_the_struct() {
        let src = "package v1\n\ntype S struct {\n\tA int\n}\n";
        let mut tree = parse(src).unwrap();
        let r = find_type_by_name(&tree, "S").unwrap().unwrap();
        replace_field_list(&mut tree, &r, &[]).unwrap();
        assert_eq!(tree.to_string(), "package v1\n\ntype S struct {\n}\n");
    }

    #[test]
    fn test_non_struct_is_rejected() {
        let mut tree = parse("package v1\n\ntype S int\n").unwrap();
        let r = find_type_by_name(&tree, "S").unwrap().unwrap();
        assert!(replace_field_list(&mut tree, &r, &[]).is_err());
    }
}
