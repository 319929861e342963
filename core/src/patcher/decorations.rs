use crate::error::AppResult;
use crate::patcher::common::node_mut;
use crate::syntax::{Decoration, NodeRef, SourceTree};

/// Appends comment `lines` to the comment block directly above the node.
///
/// Existing comments are kept; new lines go after the last one, at the
/// node's indentation. A node without comments gets a fresh block between
/// the preceding blank space and the node itself.
pub fn append_annotations(tree: &mut SourceTree, r: &NodeRef, lines: &[String]) -> AppResult<()> {
    if lines.is_empty() {
        return Ok(());
    }
    let node = node_mut(tree, r)?;
    let start = &mut node.decs.start;

    match start.iter().rposition(Decoration::is_comment) {
        Some(last) => {
            let trailing: String = start[last + 1..].iter().map(Decoration::text).collect();
            let indent = trailing
                .rfind('\n')
                .map_or("", |pos| &trailing[pos + 1..])
                .to_string();
            let added = lines.iter().flat_map(|line| {
                [
                    Decoration::Space(format!("\n{}", indent)),
                    Decoration::Comment(line.clone()),
                ]
            });
            let tail = start.split_off(last + 1);
            start.extend(added);
            start.extend(tail);
        }
        None => {
            let space: String = start.iter().map(Decoration::text).collect();
            let (head, indent) = match space.rfind('\n') {
                Some(pos) => space.split_at(pos + 1),
                None => ("", space.as_str()),
            };
            let mut decorated = Vec::with_capacity(lines.len() * 2 + 1);
            if !head.is_empty() {
                decorated.push(Decoration::Space(head.to_string()));
            }
            for line in lines {
                decorated.push(Decoration::Space(indent.to_string()));
                decorated.push(Decoration::Comment(line.clone()));
                decorated.push(Decoration::Space("\n".to_string()));
            }
            decorated.push(Decoration::Space(indent.to_string()));
            decorated.retain(|d| !d.text().is_empty());
            *start = decorated;
        }
    }
    Ok(())
}
