//! # Decorated Tree
//!
//! An owned concrete syntax tree in which every node carries the whitespace
//! and comments that precede it (its *start* decorations) and, for interior
//! nodes, the trivia between its last child and its end (its *end*
//! decorations). Every byte of the parsed text belongs to exactly one token
//! or decoration, so printing an unmodified tree reproduces the input.

use std::fmt;
use std::ops::Range;

/// A piece of trivia attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoration {
    /// Whitespace, including newlines.
    Space(String),
    /// A line or block comment, verbatim.
    Comment(String),
}

impl Decoration {
    /// The raw text of the decoration.
    pub fn text(&self) -> &str {
        match self {
            Decoration::Space(s) | Decoration::Comment(s) => s,
        }
    }

    /// Whether this is a comment.
    pub fn is_comment(&self) -> bool {
        matches!(self, Decoration::Comment(_))
    }
}

/// Leading and trailing trivia of a node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decorations {
    /// Trivia printed before the node.
    pub start: Vec<Decoration>,
    /// Trivia printed after the node's last child.
    pub end: Vec<Decoration>,
}

impl Decorations {
    /// Start decorations consisting of a single whitespace run.
    pub fn space(text: impl Into<String>) -> Self {
        Decorations {
            start: vec![Decoration::Space(text.into())],
            end: Vec::new(),
        }
    }

    /// The indentation of the line the node starts on, if the start
    /// decorations contain a line break.
    pub fn indent(&self) -> Option<&str> {
        let last = self.start.last()?;
        match last {
            Decoration::Space(s) => s.rfind('\n').map(|pos| &s[pos + 1..]),
            Decoration::Comment(_) => None,
        }
    }

    /// Whether any comment precedes the node.
    pub fn has_comments(&self) -> bool {
        self.start.iter().any(Decoration::is_comment)
    }
}

/// The payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// A leaf token.
    Token(String),
    /// An interior node.
    Children(Vec<Node>),
}

/// A node of the decorated tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: String,
    field: Option<String>,
    named: bool,
    /// Attached trivia.
    pub decs: Decorations,
    body: Body,
    origin: Option<Range<usize>>,
}

impl Node {
    pub(crate) fn parsed(
        kind: &str,
        field: Option<&str>,
        named: bool,
        decs: Decorations,
        body: Body,
        origin: Range<usize>,
    ) -> Self {
        Node {
            kind: kind.to_string(),
            field: field.map(str::to_string),
            named,
            decs,
            body,
            origin: Some(origin),
        }
    }

    /// Creates an anonymous (punctuation or keyword) token.
    pub fn token(text: impl Into<String>) -> Self {
        let text = text.into();
        Node {
            kind: text.clone(),
            field: None,
            named: false,
            decs: Decorations::default(),
            body: Body::Token(text),
            origin: None,
        }
    }

    /// The grammar kind, e.g. `type_spec`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The field name this node occupies in its parent, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Whether the node is a named grammar node (as opposed to punctuation).
    pub fn is_named(&self) -> bool {
        self.named
    }

    /// Byte range in the originally parsed text. `None` for synthesized nodes.
    pub fn origin(&self) -> Option<&Range<usize>> {
        self.origin.as_ref()
    }

    /// The token text of a leaf.
    pub fn token_text(&self) -> Option<&str> {
        match &self.body {
            Body::Token(t) => Some(t),
            Body::Children(_) => None,
        }
    }

    /// Children of an interior node (empty for leaves).
    pub fn children(&self) -> &[Node] {
        match &self.body {
            Body::Children(c) => c,
            Body::Token(_) => &[],
        }
    }

    /// Mutable children. Leaves have none and return `None`.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.body {
            Body::Children(c) => Some(c),
            Body::Token(_) => None,
        }
    }

    /// Named children, skipping punctuation and keywords.
    pub fn named_children(&self) -> impl Iterator<Item = &Node> {
        self.children().iter().filter(|c| c.named)
    }

    /// The first child occupying `field`.
    pub fn child_by_field(&self, field: &str) -> Option<&Node> {
        self.children().iter().find(|c| c.field() == Some(field))
    }

    /// Index of the first child occupying `field`.
    pub fn child_index_by_field(&self, field: &str) -> Option<usize> {
        self.children().iter().position(|c| c.field() == Some(field))
    }

    /// Index of the first child of the given kind.
    pub fn child_index_by_kind(&self, kind: &str) -> Option<usize> {
        self.children().iter().position(|c| c.kind() == kind)
    }

    /// The node's own text: body and end decorations, without start decorations.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_body(&mut out);
        out
    }

    /// Clears origin ranges recursively, for nodes lifted out of another tree.
    pub fn detach(mut self) -> Self {
        self.clear_origin();
        self
    }

    fn clear_origin(&mut self) {
        self.origin = None;
        if let Body::Children(children) = &mut self.body {
            children.iter_mut().for_each(Node::clear_origin);
        }
    }

    fn write_to(&self, out: &mut String) {
        for d in &self.decs.start {
            out.push_str(d.text());
        }
        self.write_body(out);
    }

    fn write_body(&self, out: &mut String) {
        match &self.body {
            Body::Token(t) => out.push_str(t),
            Body::Children(children) => {
                for child in children {
                    child.write_to(out);
                }
            }
        }
        for d in &self.decs.end {
            out.push_str(d.text());
        }
    }

    /// Depth-first, pre-order search for nodes matching `pred`.
    pub(crate) fn collect<'a>(
        &'a self,
        path: &mut Vec<usize>,
        pred: &mut impl FnMut(&'a Node) -> bool,
        hits: &mut Vec<NodeRef>,
    ) {
        if pred(self) {
            hits.push(NodeRef(path.clone()));
        }
        for (i, child) in self.children().iter().enumerate() {
            path.push(i);
            child.collect(path, pred, hits);
            path.pop();
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_to(&mut out);
        f.write_str(&out)
    }
}

/// A path of child indices from the root to a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodeRef(pub(crate) Vec<usize>);

impl NodeRef {
    /// The root node.
    pub fn root() -> Self {
        NodeRef(Vec::new())
    }

    /// The `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.0.clone();
        path.push(index);
        NodeRef(path)
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, head) = self.0.split_last()?;
        Some(NodeRef(head.to_vec()))
    }

    /// Position of this node within its parent.
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Number of steps from the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Index of the top-level declaration containing this node.
    pub fn top_level(&self) -> Option<usize> {
        self.0.first().copied()
    }
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct SourceTree {
    label: String,
    source: String,
    root: Node,
}

impl SourceTree {
    pub(crate) fn new(label: &str, source: &str, root: Node) -> Self {
        SourceTree {
            label: label.to_string(),
            source: source.to_string(),
            root,
        }
    }

    /// Name of the file the tree was parsed from (used in messages).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The root (`source_file`) node.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Resolves a reference.
    pub fn get(&self, r: &NodeRef) -> Option<&Node> {
        r.0.iter()
            .try_fold(&self.root, |node, &i| node.children().get(i))
    }

    /// Resolves a reference mutably.
    pub fn get_mut(&mut self, r: &NodeRef) -> Option<&mut Node> {
        let mut node = &mut self.root;
        for &i in &r.0 {
            node = node.children_mut()?.get_mut(i)?;
        }
        Some(node)
    }

    /// All nodes matching `pred`, depth-first in source order.
    pub fn find_all<'a>(&'a self, mut pred: impl FnMut(&'a Node) -> bool) -> Vec<NodeRef> {
        let mut hits = Vec::new();
        self.root.collect(&mut Vec::new(), &mut pred, &mut hits);
        hits
    }

    /// Leading whitespace of the source line on which the referenced node
    /// started. Empty for synthesized nodes.
    pub fn line_indent(&self, r: &NodeRef) -> String {
        let Some(start) = self.get(r).and_then(|n| n.origin()).map(|o| o.start) else {
            return String::new();
        };
        let line_start = self.source[..start].rfind('\n').map_or(0, |p| p + 1);
        self.source[line_start..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect()
    }
}

impl fmt::Display for SourceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: &str, text: &str, lead: &str) -> Node {
        Node::parsed(
            kind,
            None,
            true,
            Decorations::space(lead),
            Body::Token(text.into()),
            0..0,
        )
    }

    #[test]
    fn test_print_concatenates_decorations() {
        let mut decs = Decorations::space("\n");
        decs.start.push(Decoration::Comment("// doc".into()));
        decs.start.push(Decoration::Space("\n".into()));
        let node = Node::parsed(
            "type_declaration",
            None,
            true,
            decs,
            Body::Children(vec![leaf("type", "type", ""), leaf("x", "X int", " ")]),
            0..0,
        );
        assert_eq!(node.to_string(), "\n// doc\ntype X int");
        assert_eq!(node.text(), "type X int");
    }

    #[test]
    fn test_indent_detection() {
        assert_eq!(Decorations::space("\n\t\t").indent(), Some("\t\t"));
        assert_eq!(Decorations::space(" ").indent(), None);
        assert!(!Decorations::space("\n").has_comments());
    }

    #[test]
    fn test_node_ref_navigation() {
        let r = NodeRef::root().child(2).child(0);
        assert_eq!(r.index(), Some(0));
        assert_eq!(r.depth(), 2);
        assert_eq!(r.parent(), Some(NodeRef::root().child(2)));
        assert_eq!(NodeRef::root().parent(), None);
    }
}
