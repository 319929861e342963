#![deny(missing_docs)]

//! # Source Patching
//!
//! Structural edits on the decorated Go tree. Each edit touches only the
//! targeted node; every other byte of the file is printed back unchanged.
//!
//! - **structs**: replacing a struct's field list.
//! - **decorations**: appending comment lines above a declaration.
//! - **literals**: setting or removing a key of a composite literal argument.
//! - **files**: file-level items like imports.
//! - **workflows**: per-file recipes (types, controller, manager).

pub(crate) mod common;

/// Comment decoration edits.
pub mod decorations;

/// File-level patching operations (e.g. imports).
pub mod files;

/// Composite literal edits.
pub mod literals;

/// Struct-level patching operations.
pub mod structs;

/// High-level patching workflows.
pub mod workflows;

pub use decorations::append_annotations;
pub use files::{ensure_import, remove_import_if_unused};
pub use literals::{patch_named_argument_literal, LiteralOutcome, LiteralPatch};
pub use structs::replace_field_list;
pub use workflows::{patch_controller_source, patch_manager_source, patch_types_source};
