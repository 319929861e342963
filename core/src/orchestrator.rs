#![deny(missing_docs)]

//! # Orchestrator
//!
//! Drives one request over a scaffolded project tree. Resources are processed
//! one at a time, in request order:
//!
//! 1. the types file (required),
//! 2. the controller file, when the resource has one,
//! 3. each enabled webhook: scaffold, then tune its markers (best effort).
//!
//! The manager's namespace scope is patched once all resources are done.
//! Every file is read, transformed in memory and replaced whole; a file whose
//! content would not change is never written.

use crate::error::{AppError, AppResult};
use crate::layout::{GroupingMode, ProjectLayout};
use crate::model::{OperatorRequest, ResourceDefinition, WebhookDefinition};
use crate::patcher::{patch_controller_source, patch_manager_source, patch_types_source};
use crate::synth::NamespaceScope;
use crate::type_mapping::OpenApiToGoMapper;
use crate::webhook_patcher::{patch_webhook_markers, WebhookOverrides};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// The external scaffolding step the engine calls into.
pub trait Scaffolder {
    /// Produces the webhook file for `webhook` of `resource` under `root`.
    fn create_webhook(
        &self,
        root: &Path,
        resource: &ResourceDefinition,
        webhook: &WebhookDefinition,
    ) -> AppResult<()>;
}

/// A scaffolder for trees generated ahead of time: every step is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreScaffolded;

impl Scaffolder for PreScaffolded {
    fn create_webhook(
        &self,
        _root: &Path,
        resource: &ResourceDefinition,
        webhook: &WebhookDefinition,
    ) -> AppResult<()> {
        debug!(kind = %resource.kind, webhook = ?webhook.kind, "Assuming webhook is already scaffolded");
        Ok(())
    }
}

/// Knobs for a run.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    /// Compute every change but write nothing.
    pub dry_run: bool,
    /// Manager entry point relative to the project root (defaults to `cmd/main.go`).
    pub manager_file: Option<PathBuf>,
}

/// What a run did (or, in dry-run mode, would do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformReport {
    /// Grouping mode used to resolve paths.
    pub mode: GroupingMode,
    /// Whether the run was a dry run.
    pub dry_run: bool,
    /// Files whose content changed.
    pub rewritten: Vec<PathBuf>,
    /// Files processed without any change.
    pub unchanged: Vec<PathBuf>,
    /// Optional files that were absent or had nothing to patch.
    pub skipped: Vec<PathBuf>,
    /// Non-fatal problems.
    pub warnings: Vec<String>,
}

impl TransformReport {
    fn new(mode: GroupingMode, dry_run: bool) -> Self {
        TransformReport {
            mode,
            dry_run,
            rewritten: Vec::new(),
            unchanged: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }

    fn skip(&mut self, path: &Path) {
        if !self.skipped.iter().any(|p| p == path) {
            self.skipped.push(path.to_path_buf());
        }
    }
}

/// Applies `request` to the project at `root`.
pub fn transform_project(
    root: &Path,
    request: &OperatorRequest,
    scaffolder: &impl Scaffolder,
    options: &TransformOptions,
) -> AppResult<TransformReport> {
    let layout = ProjectLayout::new(root, request);
    let mut report = TransformReport::new(layout.mode(), options.dry_run);
    info!(
        root = %root.display(),
        mode = %layout.mode(),
        resources = request.resources.len(),
        dry_run = options.dry_run,
        "Transforming project"
    );

    for resource in &request.resources {
        transform_resource(&layout, resource, scaffolder, options, &mut report)?;
    }

    let main_file = match &options.manager_file {
        Some(rel) => root.join(rel),
        None => layout.main_file(),
    };
    let scope = NamespaceScope::from_namespaces(&request.namespaces);
    let source = read_source(&main_file)?;
    match patch_manager_source(&label(&main_file), &source, &scope)? {
        Some(updated) => commit(&main_file, &source, &updated, options, &mut report)?,
        None => {
            report.warn(format!(
                "No NewManager call with an options literal in {}; namespace scope not applied",
                main_file.display()
            ));
            report.skip(&main_file);
        }
    }

    info!(
        rewritten = report.rewritten.len(),
        unchanged = report.unchanged.len(),
        skipped = report.skipped.len(),
        warnings = report.warnings.len(),
        "Transformation complete"
    );
    Ok(report)
}

fn transform_resource(
    layout: &ProjectLayout,
    resource: &ResourceDefinition,
    scaffolder: &impl Scaffolder,
    options: &TransformOptions,
    report: &mut TransformReport,
) -> AppResult<()> {
    info!(kind = %resource.kind, group = %resource.api_group, version = %resource.version, "Processing resource");

    let types_file = layout.types_file(resource);
    if !types_file.exists() {
        return Err(AppError::TargetNotFound(format!(
            "types file {} for kind `{}`",
            types_file.display(),
            resource.kind
        )));
    }
    let source = read_source(&types_file)?;
    let updated = patch_types_source(&label(&types_file), &source, resource, &OpenApiToGoMapper)?;
    commit(&types_file, &source, &updated, options, report)?;

    if resource.has_controller {
        let controller_file = layout.controller_file(resource);
        if !controller_file.exists() {
            debug!(path = %controller_file.display(), "No controller file");
            report.skip(&controller_file);
        } else {
            let source = read_source(&controller_file)?;
            match patch_controller_source(&label(&controller_file), &source, resource)? {
                Some(updated) => commit(&controller_file, &source, &updated, options, report)?,
                None => {
                    report.warn(format!(
                        "No Reconcile function in {}; RBAC markers not added",
                        controller_file.display()
                    ));
                    report.skip(&controller_file);
                }
            }
        }
    }

    for webhook in resource.webhooks.iter().filter(|w| w.enabled) {
        apply_webhook(layout, resource, webhook, scaffolder, options, report)?;
    }
    Ok(())
}

fn apply_webhook(
    layout: &ProjectLayout,
    resource: &ResourceDefinition,
    webhook: &WebhookDefinition,
    scaffolder: &impl Scaffolder,
    options: &TransformOptions,
    report: &mut TransformReport,
) -> AppResult<()> {
    if let Err(e) = scaffolder.create_webhook(layout.root(), resource, webhook) {
        report.warn(format!(
            "Webhook scaffolding for `{}` ({:?}) failed: {}",
            resource.kind, webhook.kind, e
        ));
        return Ok(());
    }

    let overrides = WebhookOverrides::from(webhook);
    if overrides.is_empty() {
        return Ok(());
    }
    let webhook_file = layout.webhook_file(resource);
    if !webhook_file.exists() {
        report.warn(format!(
            "Webhook file {} not found; marker overrides not applied",
            webhook_file.display()
        ));
        report.skip(&webhook_file);
        return Ok(());
    }

    let source = match read_source(&webhook_file) {
        Ok(source) => source,
        Err(e) => {
            report.warn(format!("{}; marker overrides not applied", e));
            report.skip(&webhook_file);
            return Ok(());
        }
    };
    let (updated, outcome) = patch_webhook_markers(&source, &overrides);
    for attr in &outcome.missed {
        report.warn(format!(
            "Webhook attribute `{}` not patched in {}",
            attr,
            webhook_file.display()
        ));
    }
    if let Err(e) = commit(&webhook_file, &source, &updated, options, report) {
        report.warn(format!("{}; webhook markers not updated", e));
        report.skip(&webhook_file);
    }
    Ok(())
}

fn label(path: &Path) -> String {
    path.display().to_string()
}

fn read_source(path: &Path) -> AppResult<String> {
    fs::read_to_string(path).map_err(|e| AppError::file(path, e))
}

fn commit(
    path: &Path,
    original: &str,
    updated: &str,
    options: &TransformOptions,
    report: &mut TransformReport,
) -> AppResult<()> {
    if original == updated {
        debug!(path = %path.display(), "Unchanged");
        if !report.rewritten.iter().any(|p| p == path) && !report.unchanged.iter().any(|p| p == path) {
            report.unchanged.push(path.to_path_buf());
        }
        return Ok(());
    }

    if options.dry_run {
        info!(path = %path.display(), "Would rewrite");
    } else {
        write_atomic(path, updated)?;
        info!(path = %path.display(), "Rewrote");
    }
    report.unchanged.retain(|p| p != path);
    if !report.rewritten.iter().any(|p| p == path) {
        report.rewritten.push(path.to_path_buf());
    }
    Ok(())
}

/// Replaces `path` with `contents` via a temp file in the same directory,
/// keeping the original permissions.
fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)
        .map_err(|e| AppError::file(path, e))?
        .permissions();

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| AppError::file(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .map_err(|e| AppError::file(path, e))?;
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| AppError::file(path, e))?;
    tmp.persist(path).map_err(|e| AppError::file(path, e.error))?;
    Ok(())
}
