#![deny(missing_docs)]

//! # Webhook Marker Patcher
//!
//! Adjusts attribute values of an already scaffolded
//! `// +kubebuilder:webhook:...` marker line by pattern substitution on the
//! raw file text. One marker line is targeted per definition: the first whose
//! `mutating=` flag matches the webhook kind (any line for a kind without a
//! flag, or a line without one). Only the first occurrence of each attribute
//! on that line is replaced; an attribute that cannot be found is recorded as
//! a miss and never fails the run.

use crate::model::{WebhookDefinition, WebhookKind};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// The marker attributes that can be overridden, in patch order.
pub const ATTRIBUTES: [&str; 5] = [
    "path",
    "failurePolicy",
    "sideEffects",
    "matchPolicy",
    "admissionReviewVersions",
];

/// Attribute values to force onto the webhook marker. Empty values are left alone.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebhookOverrides {
    /// Webhook path.
    pub path: String,
    /// `Fail` or `Ignore`.
    pub failure_policy: String,
    /// Side-effect class.
    pub side_effects: String,
    /// `Exact` or `Equivalent`.
    pub match_policy: String,
    /// Admission review versions, joined with `;`.
    pub admission_review_versions: String,
    /// The `mutating=` flag of the marker line to patch, if the kind has one.
    pub mutating: Option<bool>,
}

impl From<&WebhookDefinition> for WebhookOverrides {
    fn from(def: &WebhookDefinition) -> Self {
        WebhookOverrides {
            path: def.path.clone(),
            failure_policy: def.failure_policy.clone(),
            side_effects: def.side_effects.clone(),
            match_policy: def.match_policy.clone(),
            admission_review_versions: def.admission_review_versions.join(";"),
            mutating: match def.kind {
                WebhookKind::Mutating => Some(true),
                WebhookKind::Validating => Some(false),
                WebhookKind::Conversion => None,
            },
        }
    }
}

impl WebhookOverrides {
    fn value_of(&self, attribute: &str) -> &str {
        match attribute {
            "path" => &self.path,
            "failurePolicy" => &self.failure_policy,
            "sideEffects" => &self.side_effects,
            "matchPolicy" => &self.match_policy,
            "admissionReviewVersions" => &self.admission_review_versions,
            _ => "",
        }
    }

    /// Whether any attribute would be attempted.
    pub fn is_empty(&self) -> bool {
        ATTRIBUTES.iter().all(|a| self.value_of(a).is_empty())
    }
}

/// What the patcher did with each non-empty override.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatchOutcome {
    /// Attributes whose value was replaced (or already matched).
    pub applied: Vec<String>,
    /// Attributes with no match in any webhook marker line, or with a value
    /// that cannot be written into a marker.
    pub missed: Vec<String>,
}

fn marker_lines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[ \t]*//[ \t]*\+kubebuilder:webhook:[^\n]*").expect("Invalid regex")
    })
}

fn mutating_flag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[:,]mutating=(true|false)(?:,|\s|$)").expect("Invalid regex"))
}

/// Start offset of the marker line `mutating` selects.
fn target_marker(text: &str, mutating: Option<bool>) -> Option<usize> {
    marker_lines()
        .find_iter(text)
        .find(|line| {
            let flag = mutating_flag()
                .captures(line.as_str())
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str() == "true");
            match (mutating, flag) {
                (Some(wanted), Some(found)) => wanted == found,
                _ => true,
            }
        })
        .map(|line| line.start())
}

fn patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        ATTRIBUTES
            .iter()
            .map(|attr| {
                let re = Regex::new(&format!(
                    r"(?m)^[ \t]*//[ \t]*\+kubebuilder:webhook:(?:[^\n]*?,)?{}=([^,\s]+)",
                    regex::escape(attr)
                ))
                .expect("Invalid regex");
                (*attr, re)
            })
            .collect()
    })
}

/// Applies `overrides` to the webhook markers in `text`.
pub fn patch_webhook_markers(text: &str, overrides: &WebhookOverrides) -> (String, PatchOutcome) {
    let mut current = text.to_string();
    let mut outcome = PatchOutcome::default();
    let target = target_marker(text, overrides.mutating);

    for (attr, re) in patterns() {
        let value = overrides.value_of(attr);
        if value.is_empty() {
            continue;
        }
        if value.contains(|c: char| c == ',' || c.is_whitespace()) {
            warn!(attribute = attr, value, "Override cannot be written into a marker");
            outcome.missed.push(attr.to_string());
            continue;
        }

        let range = target.and_then(|start| {
            let end = current[start..]
                .find('\n')
                .map_or(current.len(), |i| start + i);
            re.captures(&current[start..end])
                .and_then(|caps| caps.get(1))
                .map(|m| start + m.start()..start + m.end())
        });
        match range {
            Some(range) => {
                current.replace_range(range, value);
                debug!(attribute = attr, value, "Patched webhook marker");
                outcome.applied.push(attr.to_string());
            }
            None => {
                warn!(attribute = attr, "No webhook marker attribute to patch");
                outcome.missed.push(attr.to_string());
            }
        }
    }

    (current, outcome)
}
