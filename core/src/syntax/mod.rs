#![deny(missing_docs)]

//! # Go Syntax
//!
//! Structural parser and reprinter for Go source.
//!
//! - **tree**: the decorated tree (`Node`, `Decoration`, `SourceTree`).
//! - **parse**: tree-sitter based construction of the decorated tree.
//!
//! Printing is the `Display` impl of [`SourceTree`].

/// Parsing into the decorated tree.
pub mod parse;

/// Decorated tree types.
pub mod tree;

pub use parse::{parse, parse_labeled};
pub use tree::{Body, Decoration, Decorations, Node, NodeRef, SourceTree};
