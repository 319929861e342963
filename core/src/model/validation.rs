//! # Validation Rules
//!
//! Property validations arrive on the wire as loosely typed `{type, value}`
//! pairs. They are decoded into [`Validation`], one variant per recognized
//! kind, so marker synthesis is an exhaustive match. Unknown kinds and values
//! of the wrong shape decode to [`Validation::Unsupported`] rather than
//! failing the request.

use serde::Deserialize;
use serde_json::Value;

/// A single validation rule attached to a property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawValidation")]
pub enum Validation {
    /// Minimum string length.
    MinLength(String),
    /// Maximum string length.
    MaxLength(String),
    /// Regular expression the value must match.
    Pattern(String),
    /// Inclusive numeric minimum.
    Minimum(String),
    /// Inclusive numeric maximum.
    Maximum(String),
    /// The value must be a multiple of this.
    MultipleOf(String),
    /// Minimum array length.
    MinItems(String),
    /// Maximum array length.
    MaxItems(String),
    /// Minimum number of object keys.
    MinProperties(String),
    /// Maximum number of object keys.
    MaxProperties(String),
    /// OpenAPI string format.
    Format(String),
    /// Array items must be unique.
    UniqueItems(bool),
    /// Allowed values.
    Enum(Vec<String>),
    /// The field is required.
    Required,
    /// The field is optional.
    Optional,
    /// Default value.
    Default(String),
    /// Example value.
    Example(String),
    /// Explicit OpenAPI type override.
    Type(String),
    /// An unknown kind, or a known kind whose value has the wrong shape.
    Unsupported {
        /// The kind as it appeared on the wire.
        kind: String,
    },
}

/// Wire form of a validation entry.
#[derive(Debug, Deserialize)]
struct RawValidation {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    value: Value,
}

impl From<RawValidation> for Validation {
    fn from(raw: RawValidation) -> Self {
        let text = || match &raw.value {
            Value::String(s) => Some(s.clone()),
            _ => None,
        };

        let decoded = match raw.kind.as_str() {
            "minLength" => text().map(Validation::MinLength),
            "maxLength" => text().map(Validation::MaxLength),
            "pattern" => text().map(Validation::Pattern),
            "minimum" => text().map(Validation::Minimum),
            "maximum" => text().map(Validation::Maximum),
            "multipleOf" => text().map(Validation::MultipleOf),
            "minItems" => text().map(Validation::MinItems),
            "maxItems" => text().map(Validation::MaxItems),
            "minProperties" => text().map(Validation::MinProperties),
            "maxProperties" => text().map(Validation::MaxProperties),
            "format" => text().map(Validation::Format),
            "default" => text().map(Validation::Default),
            "example" => text().map(Validation::Example),
            "type" => text().map(Validation::Type),
            "uniqueItems" => raw.value.as_bool().map(Validation::UniqueItems),
            "enum" => raw.value.as_array().map(|items| {
                Validation::Enum(
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                )
            }),
            "required" => Some(Validation::Required),
            "optional" => Some(Validation::Optional),
            _ => None,
        };

        decoded.unwrap_or(Validation::Unsupported { kind: raw.kind })
    }
}
