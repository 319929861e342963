#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts the semantic property types of a resource schema into the Go
//! types used for `<Kind>Spec` fields. The table is fixed; anything outside
//! it becomes an untyped `interface{}`.

use crate::model::PropertyType;
use std::fmt::Display;

/// The Go field types the synthesizer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoType {
    /// `string`
    String,
    /// `int`
    Int,
    /// `float64`
    Float64,
    /// `bool`
    Bool,
    /// `[]interface{}`
    UntypedList,
    /// `map[string]interface{}`
    UntypedMap,
    /// `interface{}`
    Dynamic,
}

impl Display for GoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GoType::String => "string",
            GoType::Int => "int",
            GoType::Float64 => "float64",
            GoType::Bool => "bool",
            GoType::UntypedList => "[]interface{}",
            GoType::UntypedMap => "map[string]interface{}",
            GoType::Dynamic => "interface{}",
        };
        f.write_str(s)
    }
}

/// Trait for converting schema property types to Go types.
pub trait TypeMapper {
    /// Maps a semantic property type to a Go field type.
    fn map(&self, property_type: PropertyType) -> GoType;
}

/// The standard OpenAPI-to-Go mapping used by kubebuilder projects.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiToGoMapper;

impl TypeMapper for OpenApiToGoMapper {
    fn map(&self, property_type: PropertyType) -> GoType {
        match property_type {
            PropertyType::String => GoType::String,
            PropertyType::Integer => GoType::Int,
            PropertyType::Number => GoType::Float64,
            PropertyType::Boolean => GoType::Bool,
            PropertyType::Array => GoType::UntypedList,
            PropertyType::Object => GoType::UntypedMap,
            PropertyType::Dynamic => GoType::Dynamic,
        }
    }
}
