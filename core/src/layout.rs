//! # Project Layout
//!
//! Resolves where the scaffolder put each resource's files. The directory
//! shape depends on the grouping mode, which is computed once per request
//! from the set of distinct API groups.

use crate::model::{OperatorRequest, ResourceDefinition};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Relative path of the controller manager entry point.
pub const MAIN_FILE: &str = "cmd/main.go";

/// Single- or multi-group directory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingMode {
    /// All resources share one API group: `api/<version>/`.
    SingleGroup,
    /// More than one API group: `api/<group>/<version>/`.
    MultiGroup,
}

impl GroupingMode {
    /// `MultiGroup` iff the resources span more than one distinct API group.
    pub fn for_resources(resources: &[ResourceDefinition]) -> Self {
        let groups: BTreeSet<&str> = resources.iter().map(|r| r.api_group.as_str()).collect();
        if groups.len() > 1 {
            GroupingMode::MultiGroup
        } else {
            GroupingMode::SingleGroup
        }
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupingMode::SingleGroup => write!(f, "single-group"),
            GroupingMode::MultiGroup => write!(f, "multi-group"),
        }
    }
}

/// File locations within a scaffolded project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
    mode: GroupingMode,
}

impl ProjectLayout {
    /// Layout for `request` rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, request: &OperatorRequest) -> Self {
        ProjectLayout {
            root: root.into(),
            mode: GroupingMode::for_resources(&request.resources),
        }
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The grouping mode in effect.
    pub fn mode(&self) -> GroupingMode {
        self.mode
    }

    /// `api/[<group>/]<version>/<kind>_types.go`
    pub fn types_file(&self, resource: &ResourceDefinition) -> PathBuf {
        let mut dir = self.root.join("api");
        if self.mode == GroupingMode::MultiGroup {
            dir.push(&resource.api_group);
        }
        dir.join(&resource.version)
            .join(format!("{}_types.go", file_stem(resource)))
    }

    /// `internal/controller/[<group>/]<kind>_controller.go`
    pub fn controller_file(&self, resource: &ResourceDefinition) -> PathBuf {
        let mut dir = self.root.join("internal").join("controller");
        if self.mode == GroupingMode::MultiGroup {
            dir.push(&resource.api_group);
        }
        dir.join(format!("{}_controller.go", file_stem(resource)))
    }

    /// `internal/webhook/<version>/<kind>_webhook.go`, in both modes.
    pub fn webhook_file(&self, resource: &ResourceDefinition) -> PathBuf {
        self.root
            .join("internal")
            .join("webhook")
            .join(&resource.version)
            .join(format!("{}_webhook.go", file_stem(resource)))
    }

    /// The controller manager entry point.
    pub fn main_file(&self) -> PathBuf {
        self.root.join(MAIN_FILE)
    }
}

fn file_stem(resource: &ResourceDefinition) -> String {
    resource.kind.to_lowercase()
}
