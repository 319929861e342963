#![deny(missing_docs)]

//! # Schema Synthesis
//!
//! Pure functions from the resource schema to the structures the patcher
//! injects:
//!
//! - **fields**: the ordered `<Kind>Spec` field list.
//! - **markers**: validation, status and RBAC markers.
//! - **namespaces**: the manager cache scope.

/// Struct field synthesis.
pub mod fields;

/// Kubebuilder marker synthesis.
pub mod markers;

/// Manager namespace scope.
pub mod namespaces;

pub use fields::{synthesize_field, synthesize_fields, to_camel_case, GoField};
pub use markers::{as_comments, rbac_markers, status_marker, validation_markers, Marker};
pub use namespaces::NamespaceScope;
