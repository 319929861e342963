#![deny(missing_docs)]

//! # Forge Core
//!
//! Structural rewriting of scaffolded Kubernetes operator source trees.
//!
//! A request describes custom resources (fields, validations, RBAC, webhooks)
//! and a namespace scope. The engine parses the Go files an external
//! scaffolder produced into a lossless decorated tree, edits exactly the
//! declarations it owns and prints everything else back byte for byte.

/// Shared error types.
pub mod error;

/// The operator request data model.
pub mod model;

/// Lossless Go parsing and printing.
pub mod syntax;

/// Locating declarations in a parsed file.
pub mod matcher;

/// Type mapping logic (schema type -> Go type).
pub mod type_mapping;

/// Field, marker and namespace synthesis.
pub mod synth;

/// Code generation utilities.
pub mod codegen;

/// Code patching utilities.
pub mod patcher;

/// Pattern-based webhook marker tuning.
pub mod webhook_patcher;

/// Project file layout.
pub mod layout;

/// Per-request orchestration.
pub mod orchestrator;

pub use error::{AppError, AppResult};
pub use layout::{GroupingMode, ProjectLayout};
pub use matcher::{
    decoration_anchor, find_constructor_call, find_function_by_name, find_type_by_name, ArgShape,
};
pub use model::{
    OperatorRequest, PropertyDefinition, PropertyType, RbacPermission, ResourceDefinition,
    Validation, WebhookDefinition, WebhookKind,
};
pub use orchestrator::{
    transform_project, PreScaffolded, Scaffolder, TransformOptions, TransformReport,
};
pub use patcher::{
    append_annotations, ensure_import, patch_controller_source, patch_manager_source,
    patch_named_argument_literal, patch_types_source, remove_import_if_unused, replace_field_list,
    LiteralOutcome, LiteralPatch,
};
pub use synth::{
    rbac_markers, status_marker, synthesize_fields, to_camel_case, validation_markers, GoField,
    Marker, NamespaceScope,
};
pub use syntax::{parse, parse_labeled, SourceTree};
pub use type_mapping::{GoType, OpenApiToGoMapper, TypeMapper};
pub use webhook_patcher::{patch_webhook_markers, PatchOutcome, WebhookOverrides};
