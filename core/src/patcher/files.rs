use crate::codegen::{make_import_declaration, make_import_spec};
use crate::error::AppResult;
use crate::patcher::common::{children_mut, detect_indent, is_terminator};
use crate::synth::namespaces::go_quote;
use crate::syntax::{Decorations, Node, NodeRef, SourceTree};

/// Adds `import "path"` unless the file already imports it.
///
/// The import joins the first parenthesized import block; a file without one
/// gets a standalone declaration after its last import (or the package
/// clause). Returns whether the tree changed.
pub fn ensure_import(tree: &mut SourceTree, path: &str) -> AppResult<bool> {
    if find_import(tree, path).is_some() {
        return Ok(false);
    }

    let grouped = tree.root().children().iter().enumerate().find_map(|(i, decl)| {
        if decl.kind() != "import_declaration" {
            return None;
        }
        decl.child_index_by_kind("import_spec_list").map(|j| (i, j))
    });

    if let Some((decl_idx, list_idx)) = grouped {
        let list_ref = NodeRef::root().child(decl_idx).child(list_idx);
        let (at, indent) = {
            let list = &tree.root().children()[decl_idx].children()[list_idx];
            let at = list
                .children()
                .iter()
                .rposition(|c| c.kind() == "import_spec")
                .map_or(1, |last| last + 1);
            (at, detect_indent(list, "import_spec").unwrap_or_else(|| "\t".into()))
        };
        let mut spec = make_import_spec(path)?;
        spec.decs = Decorations::space(format!("\n{}", indent));
        children_mut(tree, &list_ref)?.insert(at, spec);
        return Ok(true);
    }

    let root = tree.root().children();
    let (after, lead) = match root.iter().rposition(|c| c.kind() == "import_declaration") {
        Some(last) => (last, "\n"),
        None => (
            root.iter()
                .position(|c| c.kind() == "package_clause")
                .unwrap_or(0),
            "\n\n",
        ),
    };
    let mut decl = make_import_declaration(path)?;
    decl.decs = Decorations::space(lead);
    children_mut(tree, &NodeRef::root())?.insert(after + 1, decl);
    Ok(true)
}

/// Removes the import of `path` when no selector in the file refers to
/// `package` any more. Returns whether the tree changed.
pub fn remove_import_if_unused(tree: &mut SourceTree, path: &str, package: &str) -> AppResult<bool> {
    let Some(spec_ref) = find_import(tree, path) else {
        return Ok(false);
    };
    if is_referenced(tree, package) {
        return Ok(false);
    }
    let (Some(parent_ref), Some(idx)) = (spec_ref.parent(), spec_ref.index()) else {
        return Ok(false);
    };

    let standalone = tree
        .get(&parent_ref)
        .is_some_and(|p| p.kind() == "import_declaration");
    let (container, at) = if standalone {
        match (parent_ref.parent(), parent_ref.index()) {
            (Some(root), Some(decl_idx)) => (root, decl_idx),
            _ => return Ok(false),
        }
    } else {
        (parent_ref, idx)
    };

    let children = children_mut(tree, &container)?;
    children.remove(at);
    if children.get(at).is_some_and(is_terminator) {
        children.remove(at);
    }
    Ok(true)
}

fn find_import(tree: &SourceTree, path: &str) -> Option<NodeRef> {
    let quoted = go_quote(path);
    tree.find_all(|n| {
        n.kind() == "import_spec"
            && n.child_by_field("path")
                .is_some_and(|p| p.text() == quoted)
    })
    .into_iter()
    .next()
}

fn is_referenced(tree: &SourceTree, package: &str) -> bool {
    let root = tree.root().children();
    tree.find_all(|n| {
        matches!(n.kind(), "package_identifier" | "identifier") && n.token_text() == Some(package)
    })
    .iter()
    .any(|r| {
        r.top_level()
            .and_then(|i| root.get(i))
            .is_some_and(|decl: &Node| decl.kind() != "import_declaration")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse;
    use pretty_assertions::assert_eq;

    const CACHE: &str = "sigs.k8s.io/controller-runtime/pkg/cache";

    #[test]
    fn test_add_import_to_block() {
        let src = "package main\n\nimport (\n\t\"flag\"\n\t\"os\"\n)\n\nfunc main() {}\n";
        let mut tree = parse(src).unwrap();
        assert!(ensure_import(&mut tree, CACHE).unwrap());
        let out = tree.to_string();
        assert_eq!(
            out,
            "package main\n\nimport (\n\t\"flag\"\n\t\"os\"\n\t\"sigs.k8s.io/controller-runtime/pkg/cache\"\n)\n\nfunc main() {}\n"
        );

        let mut again = parse(&out).unwrap();
        assert!(!ensure_import(&mut again, CACHE).unwrap());
        assert_eq!(again.to_string(), out);
    }

    #[test]
    fn test_add_import_new_file() {
        let mut tree = parse("package main\n\nfunc main() {}\n").unwrap();
        assert!(ensure_import(&mut tree, "fmt").unwrap());
        assert_eq!(
            tree.to_string(),
            "package main\n\nimport \"fmt\"\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn test_add_import_after_single_import() {
        let mut tree = parse("package main\n\nimport \"os\"\n\nfunc main() {}\n").unwrap();
        ensure_import(&mut tree, "fmt").unwrap();
        assert_eq!(
            tree.to_string(),
            "package main\n\nimport \"os\"\nimport \"fmt\"\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn test_existing_aliased_import_is_recognised() {
        let src = "package main\n\nimport (\n\tc \"sigs.k8s.io/controller-runtime/pkg/cache\"\n)\n";
        let mut tree = parse(src).unwrap();
        assert!(!ensure_import(&mut tree, CACHE).unwrap());
    }

    #[test]
    fn test_remove_unused_import() {
        let src = "package main\n\nimport (\n\t\"os\"\n\n\t\"sigs.k8s.io/controller-runtime/pkg/cache\"\n)\n\nfunc main() { os.Exit(0) }\n";
        let mut tree = parse(src).unwrap();
        assert!(remove_import_if_unused(&mut tree, CACHE, "cache").unwrap());
        assert_eq!(
            tree.to_string(),
            "package main\n\nimport (\n\t\"os\"\n)\n\nfunc main() { os.Exit(0) }\n"
        );
    }

    #[test]
    fn test_used_import_is_kept() {
        let src = "package main\n\nimport \"sigs.k8s.io/controller-runtime/pkg/cache\"\n\nvar _ = cache.Options{}\n";
        let mut tree = parse(src).unwrap();
        assert!(!remove_import_if_unused(&mut tree, CACHE, "cache").unwrap());
        assert_eq!(tree.to_string(), src);
    }

    #[test]
    fn test_remove_standalone_import() {
        let src = "package main\n\nimport \"os\"\nimport \"sigs.k8s.io/controller-runtime/pkg/cache\"\n\nfunc main() { os.Exit(0) }\n";
        let mut tree = parse(src).unwrap();
        assert!(remove_import_if_unused(&mut tree, CACHE, "cache").unwrap());
        assert_eq!(
            tree.to_string(),
            "package main\n\nimport \"os\"\n\nfunc main() { os.Exit(0) }\n"
        );
    }
}
