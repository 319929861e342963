//! # Field Synthesis
//!
//! Turns property definitions into `<Kind>Spec` struct fields.

use crate::model::PropertyDefinition;
use crate::synth::markers::{validation_markers, Marker};
use crate::type_mapping::{GoType, TypeMapper};

/// A synthesized struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoField {
    /// Exported Go identifier.
    pub name: String,
    /// Field type.
    pub ty: GoType,
    /// The serialized (JSON) name.
    pub json_name: String,
    /// Markers placed on the lines above the field.
    pub markers: Vec<Marker>,
}

impl GoField {
    /// The struct tag literal, including backquotes.
    pub fn tag(&self) -> String {
        format!("`json:\"{},omitempty\"`", self.json_name)
    }
}

/// Converts `snake_case` or `kebab-case` to `CamelCase`.
///
/// Only the first character of each segment is upper-cased; the rest is kept,
/// so `replicaCount` becomes `ReplicaCount` and `api_URL` becomes `ApiURL`.
pub fn to_camel_case(name: &str) -> String {
    name.split(|c: char| c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Builds the field for one property.
pub fn synthesize_field(property: &PropertyDefinition, mapper: &impl TypeMapper) -> GoField {
    GoField {
        name: to_camel_case(&property.name),
        ty: mapper.map(property.property_type),
        json_name: property.name.clone(),
        markers: validation_markers(property),
    }
}

/// Builds the full field list, preserving property order.
pub fn synthesize_fields(
    properties: &[PropertyDefinition],
    mapper: &impl TypeMapper,
) -> Vec<GoField> {
    properties
        .iter()
        .map(|p| synthesize_field(p, mapper))
        .collect()
}
