//! # Marker Synthesis
//!
//! Builds kubebuilder marker lines from validation rules, the status
//! sub-resource flag and RBAC permissions.
//!
//! A marker is a single Go line comment, so marker text that would span
//! lines is never emitted.

use crate::model::{PropertyDefinition, ResourceDefinition, Validation};
use std::fmt;
use tracing::debug;

/// A kubebuilder marker, e.g. `+kubebuilder:validation:MinLength=3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker(String);

impl Marker {
    fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.contains(|c: char| c == '\n' || c == '\r') {
            debug!(marker = %text.escape_debug(), "Marker text spans lines; omitted");
            return None;
        }
        Some(Marker(text))
    }

    fn fixed(text: &'static str) -> Self {
        Marker(text.to_string())
    }

    /// The marker body, without comment syntax.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The marker as a Go line comment.
    pub fn as_comment(&self) -> String {
        format!("// {}", self.0)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders markers as comment lines.
pub fn as_comments(markers: &[Marker]) -> Vec<String> {
    markers.iter().map(Marker::as_comment).collect()
}

const CORE_GROUP: &str = "\"\"";
const ALL_VERBS: &str = "get;list;watch;create;update;patch;delete";
const STATUS_VERBS: &str = "get;update;patch";
const FINALIZER_VERBS: &str = "update";

/// Validation markers for a property, in the order its validations were given.
pub fn validation_markers(property: &PropertyDefinition) -> Vec<Marker> {
    property
        .validations
        .iter()
        .filter_map(|v| {
            let marker = validation_marker(v);
            if marker.is_none() {
                debug!(property = %property.name, validation = ?v, "No marker emitted");
            }
            marker
        })
        .collect()
}

fn validation_marker(validation: &Validation) -> Option<Marker> {
    let valued = |name: &str, value: &str| {
        if value.is_empty() {
            return None;
        }
        Marker::new(format!("+kubebuilder:validation:{}={}", name, value))
    };

    match validation {
        Validation::MinLength(v) => valued("MinLength", v),
        Validation::MaxLength(v) => valued("MaxLength", v),
        Validation::Pattern(v) => valued("Pattern", v),
        Validation::Minimum(v) => valued("Minimum", v),
        Validation::Maximum(v) => valued("Maximum", v),
        Validation::MultipleOf(v) => valued("MultipleOf", v),
        Validation::MinItems(v) => valued("MinItems", v),
        Validation::MaxItems(v) => valued("MaxItems", v),
        Validation::MinProperties(v) => valued("MinProperties", v),
        Validation::MaxProperties(v) => valued("MaxProperties", v),
        Validation::Format(v) => valued("Format", v),
        Validation::Type(v) => valued("Type", v),
        Validation::UniqueItems(true) => Some(Marker::fixed("+kubebuilder:validation:UniqueItems=true")),
        Validation::UniqueItems(false) => None,
        Validation::Enum(values) => valued("Enum", &values.join(",")),
        Validation::Required => Some(Marker::fixed("+kubebuilder:validation:Required")),
        Validation::Optional => Some(Marker::fixed("+kubebuilder:validation:Optional")),
        Validation::Default(v) if !v.is_empty() => Marker::new(format!("+kubebuilder:default:={}", v)),
        Validation::Example(v) if !v.is_empty() => Marker::new(format!("+kubebuilder:example:={}", v)),
        Validation::Default(_) | Validation::Example(_) => None,
        Validation::Unsupported { .. } => None,
    }
}

/// The marker announcing a status sub-resource on the `<Kind>` type.
pub fn status_marker() -> Marker {
    Marker::fixed("+kubebuilder:subresource:status")
}

/// RBAC markers for a resource's controller.
///
/// Always three canonical markers for the resource itself (resource,
/// `/status`, `/finalizers`), then one per user permission in input order.
/// Duplicates are emitted as given. A permission whose values span lines is
/// left out.
pub fn rbac_markers(resource: &ResourceDefinition) -> Vec<Marker> {
    let group = rbac_group(&resource.api_group);
    let plural = resource.plural();

    let canonical = [
        rbac_marker(group, &plural, ALL_VERBS),
        rbac_marker(group, &format!("{}/status", plural), STATUS_VERBS),
        rbac_marker(group, &format!("{}/finalizers", plural), FINALIZER_VERBS),
    ];

    let requested = resource.rbac.iter().map(|permission| {
        rbac_marker(
            rbac_group(&permission.api_group),
            &permission.resource_names,
            &permission.verbs,
        )
    });

    canonical.into_iter().chain(requested).flatten().collect()
}

fn rbac_group(group: &str) -> &str {
    if group.is_empty() {
        CORE_GROUP
    } else {
        group
    }
}

fn rbac_marker(group: &str, resources: &str, verbs: &str) -> Option<Marker> {
    Marker::new(format!(
        "+kubebuilder:rbac:groups={},resources={},verbs={}",
        group, resources, verbs
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyType, RbacPermission};

    fn markers_for(validations: Vec<Validation>) -> Vec<String> {
        let property = PropertyDefinition {
            name: "field".into(),
            property_type: PropertyType::String,
            validations,
        };
        validation_markers(&property)
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    fn single(v: Validation) -> String {
        let mut out = markers_for(vec![v]);
        assert_eq!(out.len(), 1);
        out.remove(0)
    }

    #[test]
    fn test_every_recognized_kind() {
        let cases = vec![
            (Validation::MinLength("1".into()), "+kubebuilder:validation:MinLength=1"),
            (Validation::MaxLength("9".into()), "+kubebuilder:validation:MaxLength=9"),
            (Validation::Pattern("^a$".into()), "+kubebuilder:validation:Pattern=^a$"),
            (Validation::Minimum("0".into()), "+kubebuilder:validation:Minimum=0"),
            (Validation::Maximum("10".into()), "+kubebuilder:validation:Maximum=10"),
            (Validation::MultipleOf("2".into()), "+kubebuilder:validation:MultipleOf=2"),
            (Validation::MinItems("1".into()), "+kubebuilder:validation:MinItems=1"),
            (Validation::MaxItems("5".into()), "+kubebuilder:validation:MaxItems=5"),
            (Validation::MinProperties("1".into()), "+kubebuilder:validation:MinProperties=1"),
            (Validation::MaxProperties("3".into()), "+kubebuilder:validation:MaxProperties=3"),
            (Validation::Format("email".into()), "+kubebuilder:validation:Format=email"),
            (Validation::UniqueItems(true), "+kubebuilder:validation:UniqueItems=true"),
            (
                Validation::Enum(vec!["a".into(), "b".into()]),
                "+kubebuilder:validation:Enum=a,b",
            ),
            (Validation::Required, "+kubebuilder:validation:Required"),
            (Validation::Optional, "+kubebuilder:validation:Optional"),
            (Validation::Default("x".into()), "+kubebuilder:default:=x"),
            (Validation::Example("y".into()), "+kubebuilder:example:=y"),
            (Validation::Type("string".into()), "+kubebuilder:validation:Type=string"),
        ];
        assert_eq!(cases.len(), 18);
        for (validation, expected) in cases {
            assert_eq!(single(validation), expected);
        }
    }

    #[test]
    fn test_empty_values_and_unknown_kinds_emit_nothing() {
        let out = markers_for(vec![
            Validation::MinLength(String::new()),
            Validation::UniqueItems(false),
            Validation::Enum(vec![]),
            Validation::Default(String::new()),
            Validation::Unsupported {
                kind: "itemsEnum".into(),
            },
        ]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_order_within_property_is_preserved() {
        let out = markers_for(vec![
            Validation::Required,
            Validation::MaxLength("4".into()),
            Validation::MinLength("2".into()),
        ]);
        assert_eq!(
            out,
            vec![
                "+kubebuilder:validation:Required",
                "+kubebuilder:validation:MaxLength=4",
                "+kubebuilder:validation:MinLength=2",
            ]
        );
    }

    #[test]
    fn test_rbac_canonical_markers() {
        let resource = ResourceDefinition {
            api_group: "apps".into(),
            kind: "Widget".into(),
            ..Default::default()
        };
        let out = rbac_markers(&resource);
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[0].as_comment(),
            "// +kubebuilder:rbac:groups=apps,resources=widgets,verbs=get;list;watch;create;update;patch;delete"
        );
        assert_eq!(
            out[1].as_str(),
            "+kubebuilder:rbac:groups=apps,resources=widgets/status,verbs=get;update;patch"
        );
        assert_eq!(
            out[2].as_str(),
            "+kubebuilder:rbac:groups=apps,resources=widgets/finalizers,verbs=update"
        );
    }

    #[test]
    fn test_rbac_user_permissions_in_order_without_dedup() {
        let permission = RbacPermission {
            api_group: String::new(),
            resource_names: "configmaps".into(),
            verbs: "get;list".into(),
            preset: None,
        };
        let resource = ResourceDefinition {
            api_group: "apps".into(),
            kind: "Widget".into(),
            rbac: vec![
                permission.clone(),
                RbacPermission {
                    api_group: "batch".into(),
                    resource_names: "jobs".into(),
                    verbs: "create".into(),
                    preset: None,
                },
                permission,
            ],
            ..Default::default()
        };
        let out = rbac_markers(&resource);
        assert_eq!(out.len(), 6);
        assert_eq!(
            out[3].as_str(),
            "+kubebuilder:rbac:groups=\"\",resources=configmaps,verbs=get;list"
        );
        assert_eq!(
            out[4].as_str(),
            "+kubebuilder:rbac:groups=batch,resources=jobs,verbs=create"
        );
        assert_eq!(out[5], out[3]);
    }

    #[test]
    fn test_multiline_values_emit_nothing() {
        let out = markers_for(vec![
            Validation::Pattern("x\nEvil".into()),
            Validation::Default("a\r\nb".into()),
            Validation::Example("1\n2".into()),
            Validation::Enum(vec!["a".into(), "b\nc".into()]),
            Validation::MaxLength("4".into()),
        ]);
        assert_eq!(out, vec!["+kubebuilder:validation:MaxLength=4"]);
    }

    #[test]
    fn test_rbac_permission_spanning_lines_is_left_out() {
        let resource = ResourceDefinition {
            api_group: "apps".into(),
            kind: "Widget".into(),
            rbac: vec![
                RbacPermission {
                    api_group: String::new(),
                    resource_names: "pods\nbroken(".into(),
                    verbs: "get".into(),
                    preset: None,
                },
                RbacPermission {
                    api_group: "batch\r".into(),
                    resource_names: "jobs".into(),
                    verbs: "get".into(),
                    preset: None,
                },
                RbacPermission {
                    api_group: String::new(),
                    resource_names: "secrets".into(),
                    verbs: "get;\nlist".into(),
                    preset: None,
                },
                RbacPermission {
                    api_group: String::new(),
                    resource_names: "configmaps".into(),
                    verbs: "get".into(),
                    preset: None,
                },
            ],
            ..Default::default()
        };
        let out = rbac_markers(&resource);
        assert_eq!(out.len(), 4);
        assert_eq!(
            out[3].as_str(),
            "+kubebuilder:rbac:groups=\"\",resources=configmaps,verbs=get"
        );
        assert!(out.iter().all(|m| !m.as_str().contains('\n')));
    }

    #[test]
    fn test_status_marker() {
        assert_eq!(
            status_marker().as_comment(),
            "// +kubebuilder:subresource:status"
        );
    }
}
