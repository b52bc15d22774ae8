//! Cascading per-file default rules
//!
//! Rules carry a scope (a source-path prefix and/or a frontmatter
//! metadata condition) and a set of default values. This module fixes
//! their authoritative override order; the per-file defaulting step that
//! applies them lives outside this crate, and later rules in the output
//! are expected to override fields set by earlier ones.

use loam_fs::SitePath;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The matching condition of a default rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scope {
    /// Source-path prefix; absolutized against the source root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Frontmatter condition: every entry must match the file's metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

/// One cascading default rule. Immutable once sorted and normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultRule {
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub values: Map<String, Value>,
}

/// Sort rules into override order and absolutize their scope paths.
///
/// Composite ascending sort key: primary is the `scope.path` string
/// length (absent counts as 0), secondary is metadata presence (absent
/// 0, present 1). The sort is stable, so equal-key rules keep their
/// registration order. Broader scopes therefore come first and more
/// specific ones later, where they win.
pub fn resolve_defaults(mut rules: Vec<DefaultRule>, source: &SitePath) -> Vec<DefaultRule> {
    rules.sort_by_key(|rule| {
        (
            rule.scope.path.as_deref().map_or(0, str::len),
            usize::from(rule.scope.metadata.is_some()),
        )
    });

    for rule in &mut rules {
        if let Some(path) = &rule.scope.path {
            rule.scope.path = Some(SitePath::new(path).absolutize(source).as_str().to_string());
        }
    }

    rules
}
