use crate::error::{AppError, AppResult};
use crate::matcher::{
    decoration_anchor, find_constructor_call, find_function_by_name, find_type_by_name, ArgShape,
};
use crate::model::ResourceDefinition;
use crate::patcher::decorations::append_annotations;
use crate::patcher::files::{ensure_import, remove_import_if_unused};
use crate::patcher::literals::{patch_named_argument_literal, LiteralOutcome, LiteralPatch};
use crate::patcher::structs::replace_field_list;
use crate::synth::namespaces::{CACHE_FIELD, CACHE_IMPORT_PATH, CACHE_PACKAGE, MANAGER_CONSTRUCTOR};
use crate::synth::{as_comments, rbac_markers, status_marker, synthesize_fields, NamespaceScope};
use crate::syntax::parse_labeled;
use crate::type_mapping::TypeMapper;
use tracing::{debug, info};

/// Argument shape of `ctrl.NewManager(config, ctrl.Options{...})`.
pub const MANAGER_ARGS: ArgShape = ArgShape {
    arity: 2,
    literal_at: 1,
};

/// Name of the reconciler method the RBAC markers document.
pub const RECONCILE_FN: &str = "Reconcile";

/// Rewrites a resource's types file: the `<Kind>Spec` fields, and the status
/// sub-resource marker on `<Kind>` when requested.
pub fn patch_types_source(
    label: &str,
    source: &str,
    resource: &ResourceDefinition,
    mapper: &impl TypeMapper,
) -> AppResult<String> {
    let mut tree = parse_labeled(label, source)?;

    let spec_name = resource.spec_type_name();
    let spec_ref = find_type_by_name(&tree, &spec_name)?.ok_or_else(|| {
        AppError::TargetNotFound(format!("type `{}` in {}", spec_name, label))
    })?;
    let fields = synthesize_fields(&resource.properties, mapper);
    replace_field_list(&mut tree, &spec_ref, &fields)?;
    debug!(kind = %resource.kind, fields = fields.len(), "Replaced spec fields");

    if resource.has_status_subresource {
        let kind_ref = find_type_by_name(&tree, &resource.kind)?.ok_or_else(|| {
            AppError::TargetNotFound(format!("type `{}` in {}", resource.kind, label))
        })?;
        let anchor = decoration_anchor(&tree, &kind_ref);
        append_annotations(&mut tree, &anchor, &[status_marker().as_comment()])?;
        debug!(kind = %resource.kind, "Added status sub-resource marker");
    }

    Ok(tree.to_string())
}

/// Adds the RBAC markers above the reconciler's `Reconcile` method.
///
/// Returns `None` when the file has no `Reconcile` function.
pub fn patch_controller_source(
    label: &str,
    source: &str,
    resource: &ResourceDefinition,
) -> AppResult<Option<String>> {
    let mut tree = parse_labeled(label, source)?;
    let Some(reconcile) = find_function_by_name(&tree, RECONCILE_FN)? else {
        return Ok(None);
    };
    let markers = rbac_markers(resource);
    append_annotations(&mut tree, &reconcile, &as_comments(&markers))?;
    debug!(kind = %resource.kind, markers = markers.len(), "Added RBAC markers");
    Ok(Some(tree.to_string()))
}

/// Applies the namespace scope to the manager options in `main.go`.
///
/// Returns `None` when the file has no `NewManager(config, Options{...})`
/// call.
pub fn patch_manager_source(
    label: &str,
    source: &str,
    scope: &NamespaceScope,
) -> AppResult<Option<String>> {
    let mut tree = parse_labeled(label, source)?;
    let Some(call) = find_constructor_call(&tree, MANAGER_CONSTRUCTOR, MANAGER_ARGS)? else {
        return Ok(None);
    };

    // Literal first: import edits shift top-level indices.
    match scope.cache_options() {
        Some(options) => {
            patch_named_argument_literal(
                &mut tree,
                &call,
                MANAGER_ARGS.literal_at,
                CACHE_FIELD,
                LiteralPatch::Set(options),
            )?;
            if ensure_import(&mut tree, CACHE_IMPORT_PATH)? {
                debug!(file = label, "Added cache import");
            }
        }
        None => {
            let outcome = patch_named_argument_literal(
                &mut tree,
                &call,
                MANAGER_ARGS.literal_at,
                CACHE_FIELD,
                LiteralPatch::Remove,
            )?;
            if outcome == LiteralOutcome::Removed
                && remove_import_if_unused(&mut tree, CACHE_IMPORT_PATH, CACHE_PACKAGE)?
            {
                debug!(file = label, "Dropped unused cache import");
            }
        }
    }
    info!(file = label, scope = ?scope, "Applied namespace scope");
    Ok(Some(tree.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PropertyDefinition, PropertyType, RbacPermission, Validation};
    use crate::type_mapping::OpenApiToGoMapper;
    use pretty_assertions::assert_eq;

    const TYPES: &str = r#"package v1

import (
	metav1 "k8s.io/apimachinery/pkg/apis/meta/v1"
)

// WidgetSpec defines the desired state of Widget
type WidgetSpec struct {
	// Foo is an example field of Widget. Edit widget_types.go to remove/update
	Foo string `json:"foo,omitempty"`
}

// +kubebuilder:object:root=true

// Widget is the Schema for the widgets API
type Widget struct {
	metav1.TypeMeta   `json:",inline"`
	metav1.ObjectMeta `json:"metadata,omitempty"`

	Spec WidgetSpec `json:"spec,omitempty"`
}
"#;

    const CONTROLLER: &str = r#"package controller

// WidgetReconciler reconciles a Widget object
type WidgetReconciler struct{}

// Reconcile is part of the main kubernetes reconciliation loop
func (r *WidgetReconciler) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {
	return ctrl.Result{}, nil
}
"#;

    const MAIN: &str = r#"package main

import (
	"os"

	ctrl "sigs.k8s.io/controller-runtime"
)

func main() {
	mgr, err := ctrl.NewManager(ctrl.GetConfigOrDie(), ctrl.Options{
		Scheme:           scheme,
		LeaderElectionID: "abc.example.com",
	})
	if err != nil {
		os.Exit(1)
	}
	_ = mgr
}
"#;

    fn widget() -> ResourceDefinition {
        ResourceDefinition {
            api_group: "apps".into(),
            version: "v1".into(),
            kind: "Widget".into(),
            plural_name: String::new(),
            has_controller: true,
            has_status_subresource: true,
            rbac: vec![],
            properties: vec![
                PropertyDefinition {
                    name: "image".into(),
                    property_type: PropertyType::String,
                    validations: vec![],
                },
                PropertyDefinition {
                    name: "replicas".into(),
                    property_type: PropertyType::Integer,
                    validations: vec![Validation::Minimum("1".into())],
                },
            ],
            webhooks: vec![],
        }
    }

    #[test]
    fn test_types_workflow() {
        let out = patch_types_source("widget_types.go", TYPES, &widget(), &OpenApiToGoMapper)
            .unwrap();
        assert!(out.contains(
            "type WidgetSpec struct {\n\tImage string `json:\"image,omitempty\"`\n\t// +kubebuilder:validation:Minimum=1\n\tReplicas int `json:\"replicas,omitempty\"`\n}"
        ));
        assert!(out.contains(
            "// Widget is the Schema for the widgets API\n// +kubebuilder:subresource:status\ntype Widget struct {"
        ));
        assert!(!out.contains("Foo string"));
        assert!(out.contains("\tmetav1.TypeMeta   `json:\",inline\"`\n"));
    }

    #[test]
    fn test_types_workflow_without_status() {
        let mut resource = widget();
        resource.has_status_subresource = false;
        let out = patch_types_source("t.go", TYPES, &resource, &OpenApiToGoMapper).unwrap();
        assert!(!out.contains("subresource:status"));
    }

    #[test]
    fn test_types_workflow_requires_spec_type() {
        let mut resource = widget();
        resource.kind = "Gadget".into();
        let err = patch_types_source("t.go", TYPES, &resource, &OpenApiToGoMapper).unwrap_err();
        assert!(matches!(err, AppError::TargetNotFound(_)));
    }

    #[test]
    fn test_controller_workflow() {
        let mut resource = widget();
        resource.rbac = vec![RbacPermission {
            api_group: String::new(),
            resource_names: "pods".into(),
            verbs: "get;list".into(),
            preset: None,
        }];
        let out = patch_controller_source("c.go", CONTROLLER, &resource)
            .unwrap()
            .unwrap();
        assert_eq!(
            out,
            r#"package controller

// WidgetReconciler reconciles a Widget object
type WidgetReconciler struct{}

// Reconcile is part of the main kubernetes reconciliation loop
// +kubebuilder:rbac:groups=apps,resources=widgets,verbs=get;list;watch;create;update;patch;delete
// +kubebuilder:rbac:groups=apps,resources=widgets/status,verbs=get;update;patch
// +kubebuilder:rbac:groups=apps,resources=widgets/finalizers,verbs=update
// +kubebuilder:rbac:groups="",resources=pods,verbs=get;list
func (r *WidgetReconciler) Reconcile(ctx context.Context, req ctrl.Request) (ctrl.Result, error) {
	return ctrl.Result{}, nil
}
"#
        );
    }

    #[test]
    fn test_types_output_stays_valid_with_multiline_values() {
        let mut resource = widget();
        resource.properties[0].validations = vec![
            Validation::Pattern("x\nEvil".into()),
            Validation::Default("a\r\nb".into()),
            Validation::Example("/* x */ y*/".into()),
        ];
        let out = patch_types_source("t.go", TYPES, &resource, &OpenApiToGoMapper).unwrap();
        assert!(parse_labeled("t.go", &out).is_ok());
        assert!(!out.contains("Evil"));
        assert!(!out.contains("default:="));
        assert!(out.contains(
            "type WidgetSpec struct {\n\t// +kubebuilder:example:=/* x */ y*/\n\tImage string"
        ));
    }

    #[test]
    fn test_controller_output_stays_valid_with_multiline_values() {
        let mut resource = widget();
        resource.rbac = vec![
            RbacPermission {
                api_group: String::new(),
                resource_names: "pods\nbroken(".into(),
                verbs: "get".into(),
                preset: None,
            },
            RbacPermission {
                api_group: String::new(),
                resource_names: "secrets".into(),
                verbs: "get\r".into(),
                preset: None,
            },
        ];
        let out = patch_controller_source("c.go", CONTROLLER, &resource)
            .unwrap()
            .unwrap();
        assert!(parse_labeled("c.go", &out).is_ok());
        assert!(!out.contains("broken"));
        assert!(!out.contains("secrets"));
        assert_eq!(out.matches("+kubebuilder:rbac:").count(), 3);
    }

    #[test]
    fn test_controller_without_reconcile() {
        let src = "package controller\n\nfunc helper() {}\n";
        assert_eq!(patch_controller_source("c.go", src, &widget()).unwrap(), None);
    }

    #[test]
    fn test_manager_scope_is_idempotent() {
        let scope = NamespaceScope::from_namespaces(&["default".into()]);
        let once = patch_manager_source("main.go", MAIN, &scope).unwrap().unwrap();
        assert!(once.contains(
            "\t\tLeaderElectionID: \"abc.example.com\",\n\t\tCache: cache.Options{\n\t\t\tDefaultNamespaces: map[string]cache.Config{\n\t\t\t\t\"default\": cache.Config{},\n\t\t\t},\n\t\t},\n\t})"
        ));
        assert_eq!(once.matches("\"sigs.k8s.io/controller-runtime/pkg/cache\"").count(), 1);

        let twice = patch_manager_source("main.go", &once, &scope).unwrap().unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn test_manager_cluster_scope_restores_original() {
        let scope = NamespaceScope::from_namespaces(&["default".into()]);
        let scoped = patch_manager_source("main.go", MAIN, &scope).unwrap().unwrap();
        let cleared = patch_manager_source("main.go", &scoped, &NamespaceScope::ClusterWide)
            .unwrap()
            .unwrap();
        assert_eq!(cleared, MAIN);
    }

    #[test]
    fn test_manager_without_constructor() {
        let src = "package main\n\nfunc main() {}\n";
        assert_eq!(
            patch_manager_source("main.go", src, &NamespaceScope::ClusterWide).unwrap(),
            None
        );
    }
}
