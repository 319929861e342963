#![deny(missing_docs)]

//! # Apply Command
//!
//! Loads a request and rewrites the project tree in place.

use std::path::PathBuf;

use forge_core::{
    transform_project, AppResult, OperatorRequest, PreScaffolded, TransformOptions,
    TransformReport,
};
use tracing::info;

/// Arguments for the apply command.
#[derive(clap::Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Root of the scaffolded operator project.
    #[clap(long, env = "OPERATOR_FORGE_PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Request file (`.json`, `.yaml` or `.yml`).
    #[clap(long, env = "OPERATOR_FORGE_REQUEST")]
    pub request: PathBuf,

    /// Compute every change without writing.
    #[clap(long)]
    pub dry_run: bool,

    /// Manager entry point relative to the project root.
    #[clap(long)]
    pub manager_file: Option<PathBuf>,
}

/// Executes the transformation and prints the report.
pub fn execute(args: &ApplyArgs) -> AppResult<()> {
    let request = OperatorRequest::load(&args.request)?;
    info!(
        request = %args.request.display(),
        resources = request.resources.len(),
        "Loaded request"
    );
    let options = TransformOptions {
        dry_run: args.dry_run,
        manager_file: args.manager_file.clone(),
    };
    let report = transform_project(&args.project_dir, &request, &PreScaffolded, &options)?;
    print!("{}", render_report(&report));
    Ok(())
}

fn render_report(report: &TransformReport) -> String {
    let verb = if report.dry_run { "Would rewrite" } else { "Rewrote" };
    let mut out = format!("Layout: {}\n", report.mode);
    for path in &report.rewritten {
        out.push_str(&format!("{}: {}\n", verb, path.display()));
    }
    for path in &report.unchanged {
        out.push_str(&format!("Unchanged: {}\n", path.display()));
    }
    for path in &report.skipped {
        out.push_str(&format!("Skipped: {}\n", path.display()));
    }
    for warning in &report.warnings {
        out.push_str(&format!("Warning: {}\n", warning));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MAIN: &str = "package main\n\nfunc main() {\n\tmgr, _ := ctrl.NewManager(cfg, ctrl.Options{\n\t\tScheme: scheme,\n\t})\n\t_ = mgr\n}\n";

    #[test]
    fn test_execute_applies_namespaces() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cmd")).unwrap();
        fs::write(dir.path().join("cmd/main.go"), MAIN).unwrap();
        let request = dir.path().join("request.yaml");
        fs::write(&request, "namespaces:\n  - default\ncrds: []\n").unwrap();

        let args = ApplyArgs {
            project_dir: dir.path().to_path_buf(),
            request,
            dry_run: false,
            manager_file: None,
        };
        execute(&args).unwrap();

        let main = fs::read_to_string(dir.path().join("cmd/main.go")).unwrap();
        assert!(main.contains("\"default\": cache.Config{},"));
        assert!(main.contains("import \"sigs.k8s.io/controller-runtime/pkg/cache\""));
    }

    #[test]
    fn test_render_dry_run_report() {
        let dir = tempdir().unwrap();
        let report = TransformReport {
            mode: forge_core::GroupingMode::SingleGroup,
            dry_run: true,
            rewritten: vec![dir.path().join("a.go")],
            unchanged: vec![],
            skipped: vec![],
            warnings: vec!["careful".into()],
        };
        let text = render_report(&report);
        assert!(text.starts_with("Layout: single-group\nWould rewrite: "));
        assert!(text.ends_with("Warning: careful\n"));
    }
}
