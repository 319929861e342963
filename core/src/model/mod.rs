#![deny(missing_docs)]

//! # Request Model
//!
//! The declarative description of an operator project: its resources, their
//! property schemas, RBAC needs and webhook settings. Entities are built from a
//! single inbound request and consumed by exactly one transformation pass.
//!
//! Wire names follow the JSON payload accepted by the scaffolding service
//! (`group`, `crds`, `controller`, ...); the Rust names are descriptive.

pub mod validation;

pub use validation::Validation;

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The top-level request: one operator project and its resources.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorRequest {
    /// The project domain (e.g. `example.com`).
    #[serde(rename = "domain", default)]
    pub domain_name: String,
    /// The Go module path of the generated repository.
    #[serde(rename = "repo", default)]
    pub repo_module_path: String,
    /// The project name.
    #[serde(default)]
    pub project_name: String,
    /// Namespaces the manager should watch. Empty means cluster scope.
    #[serde(default)]
    pub namespaces: Vec<String>,
    /// The custom resources, in request order.
    #[serde(rename = "crds", default)]
    pub resources: Vec<ResourceDefinition>,
}

impl OperatorRequest {
    /// Decodes a request from JSON.
    pub fn from_json(text: &str) -> AppResult<Self> {
        serde_json::from_str(text).map_err(|e| AppError::Request(format!("invalid JSON: {}", e)))
    }

    /// Decodes a request from YAML.
    pub fn from_yaml(text: &str) -> AppResult<Self> {
        serde_yaml::from_str(text).map_err(|e| AppError::Request(format!("invalid YAML: {}", e)))
    }

    /// Loads a request file, choosing the decoder by extension (`.yaml`/`.yml` or JSON).
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| AppError::file(path, e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }
}

/// A custom resource definition ("CRD").
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ResourceDefinition {
    /// API group, e.g. `apps`.
    #[serde(rename = "group", default)]
    pub api_group: String,
    /// API version, e.g. `v1`.
    #[serde(default)]
    pub version: String,
    /// The resource kind, e.g. `Widget`.
    #[serde(default)]
    pub kind: String,
    /// Optional explicit plural name.
    #[serde(rename = "plural", default)]
    pub plural_name: String,
    /// Whether a controller was scaffolded for this resource.
    #[serde(rename = "controller", default)]
    pub has_controller: bool,
    /// Whether the resource exposes a status sub-resource.
    #[serde(rename = "status", default)]
    pub has_status_subresource: bool,
    /// Additional RBAC permissions the controller needs.
    #[serde(default)]
    pub rbac: Vec<RbacPermission>,
    /// Spec properties. Order is significant.
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
    /// Admission / conversion webhooks.
    #[serde(default)]
    pub webhooks: Vec<WebhookDefinition>,
}

impl ResourceDefinition {
    /// The lowercase plural resource name used in RBAC markers.
    pub fn plural(&self) -> String {
        if self.plural_name.is_empty() {
            format!("{}s", self.kind.to_lowercase())
        } else {
            self.plural_name.to_lowercase()
        }
    }

    /// The `<Kind>Spec` type name.
    pub fn spec_type_name(&self) -> String {
        format!("{}Spec", self.kind)
    }
}

/// An extra RBAC rule granted to the resource's controller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RbacPermission {
    /// API group; empty means the core group.
    #[serde(rename = "group", default)]
    pub api_group: String,
    /// Resource names, `;`-separated as in the marker syntax.
    #[serde(rename = "resources", default)]
    pub resource_names: String,
    /// Verbs, `;`-separated.
    #[serde(default)]
    pub verbs: String,
    /// The UI preset the rule came from, if any. Informational only.
    #[serde(default)]
    pub preset: Option<String>,
}

/// The flavour of webhook requested from the scaffolder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookKind {
    /// Defaulting webhook.
    #[default]
    Mutating,
    /// Validating webhook.
    Validating,
    /// Conversion webhook.
    Conversion,
}

/// Settings for one webhook of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookDefinition {
    /// Webhook flavour.
    #[serde(rename = "type", default)]
    pub kind: WebhookKind,
    /// Admission review versions, e.g. `["v1"]`.
    #[serde(default)]
    pub admission_review_versions: Vec<String>,
    /// `Fail` or `Ignore`.
    #[serde(default)]
    pub failure_policy: String,
    /// `None`, `NoneOnDryRun`, `Some` or `Unknown`.
    #[serde(default)]
    pub side_effects: String,
    /// `Exact` or `Equivalent`.
    #[serde(default)]
    pub match_policy: String,
    /// Custom webhook path, e.g. `/mutate-apps-v1-widget`.
    #[serde(default)]
    pub path: String,
    /// Operations to intercept (`CREATE`, `UPDATE`, `DELETE`).
    #[serde(default)]
    pub operations: Vec<String>,
    /// Resources the webhook applies to.
    #[serde(default)]
    pub resources: Vec<String>,
    /// Disabled definitions are carried in the request but not applied.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// The semantic type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyType {
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// Anything else, including a missing type.
    #[default]
    Dynamic,
}

impl From<&str> for PropertyType {
    fn from(value: &str) -> Self {
        match value {
            "string" => PropertyType::String,
            "integer" => PropertyType::Integer,
            "number" => PropertyType::Number,
            "boolean" => PropertyType::Boolean,
            "array" => PropertyType::Array,
            "object" => PropertyType::Object,
            _ => PropertyType::Dynamic,
        }
    }
}

impl<'de> Deserialize<'de> for PropertyType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(PropertyType::from).unwrap_or_default())
    }
}

/// One property of the `<Kind>Spec` struct.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PropertyDefinition {
    /// The JSON name, e.g. `replica_count`.
    pub name: String,
    /// The semantic type.
    #[serde(rename = "type", default)]
    pub property_type: PropertyType,
    /// Validation rules, in the order given.
    #[serde(default)]
    pub validations: Vec<Validation>,
}
