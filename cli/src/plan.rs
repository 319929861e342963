#![deny(missing_docs)]

//! # Plan Command
//!
//! Prints where each resource's files are expected and what would be
//! injected into them, without reading or writing the project.

use std::path::PathBuf;

use forge_core::synth::as_comments;
use forge_core::{
    rbac_markers, synthesize_fields, AppResult, NamespaceScope, OpenApiToGoMapper,
    OperatorRequest, ProjectLayout,
};

/// Arguments for the plan command.
#[derive(clap::Args, Debug, Clone)]
pub struct PlanArgs {
    /// Request file (`.json`, `.yaml` or `.yml`).
    #[clap(long, env = "OPERATOR_FORGE_REQUEST")]
    pub request: PathBuf,

    /// Root used to resolve file paths.
    #[clap(long, env = "OPERATOR_FORGE_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,
}

/// Executes the plan command.
pub fn execute(args: &PlanArgs) -> AppResult<()> {
    let request = OperatorRequest::load(&args.request)?;
    print!("{}", render_plan(&request, &args.project_dir));
    Ok(())
}

fn render_plan(request: &OperatorRequest, root: &std::path::Path) -> String {
    let layout = ProjectLayout::new(root, request);
    let mut out = format!("Layout: {}\n", layout.mode());

    for resource in &request.resources {
        out.push_str(&format!(
            "\n{} ({}/{})\n",
            resource.kind, resource.api_group, resource.version
        ));
        out.push_str(&format!("  types:      {}\n", layout.types_file(resource).display()));
        if resource.has_controller {
            out.push_str(&format!(
                "  controller: {}\n",
                layout.controller_file(resource).display()
            ));
        }
        if resource.webhooks.iter().any(|w| w.enabled) {
            out.push_str(&format!("  webhook:    {}\n", layout.webhook_file(resource).display()));
        }

        out.push_str(&format!("  {}Spec fields:\n", resource.kind));
        for field in synthesize_fields(&resource.properties, &OpenApiToGoMapper) {
            for marker in &field.markers {
                out.push_str(&format!("    {}\n", marker.as_comment()));
            }
            out.push_str(&format!("    {} {}\n", field.name, field.ty));
        }
        if resource.has_controller {
            out.push_str("  rbac:\n");
            for line in as_comments(&rbac_markers(resource)) {
                out.push_str(&format!("    {}\n", line));
            }
        }
    }

    let scope = match NamespaceScope::from_namespaces(&request.namespaces) {
        NamespaceScope::ClusterWide => "cluster-wide".to_string(),
        NamespaceScope::Namespaces(ns) => ns.join(", "),
    };
    out.push_str(&format!("\nManager: {} ({})\n", layout.main_file().display(), scope));
    out
}
