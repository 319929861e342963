//! # Namespace Scope
//!
//! Describes how the controller manager's cache is scoped. An empty namespace
//! list means the manager watches the whole cluster; otherwise the
//! `Cache` option of `ctrl.Options` maps each namespace to an empty
//! `cache.Config`.

/// Import path of the controller-runtime cache package.
pub const CACHE_IMPORT_PATH: &str = "sigs.k8s.io/controller-runtime/pkg/cache";

/// Package name the cache import is referenced by.
pub const CACHE_PACKAGE: &str = "cache";

/// Key of the cache options in `ctrl.Options`.
pub const CACHE_FIELD: &str = "Cache";

/// Constructor whose options literal carries the cache settings.
pub const MANAGER_CONSTRUCTOR: &str = "NewManager";

/// Watch scope of the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    /// Watch every namespace; no `Cache` option.
    ClusterWide,
    /// Watch only these namespaces.
    Namespaces(Vec<String>),
}

impl NamespaceScope {
    /// Scope for a request's namespace list.
    pub fn from_namespaces(namespaces: &[String]) -> Self {
        if namespaces.is_empty() {
            NamespaceScope::ClusterWide
        } else {
            NamespaceScope::Namespaces(namespaces.to_vec())
        }
    }

    /// The `cache.Options{...}` value, or `None` for cluster scope.
    ///
    /// Continuation lines are indented relative to the line the value starts
    /// on; the patcher prefixes them with the surrounding indentation.
    pub fn cache_options(&self) -> Option<String> {
        let NamespaceScope::Namespaces(namespaces) = self else {
            return None;
        };
        let mut out = String::from("cache.Options{\n\tDefaultNamespaces: map[string]cache.Config{\n");
        for ns in namespaces {
            out.push_str(&format!("\t\t{}: cache.Config{{}},\n", go_quote(ns)));
        }
        out.push_str("\t},\n}");
        Some(out)
    }
}

/// Quotes a string as a Go interpreted string literal.
pub fn go_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
