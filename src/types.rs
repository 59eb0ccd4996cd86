//! Core types for document filtering.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method keys recognized as operations under a path entry.
///
/// Anything else under a path (e.g. `parameters`, `x-` extensions,
/// `summary`) is not an operation and is dropped by filtering.
pub const HTTP_METHODS: &[&str] = &["get", "post", "put", "delete", "patch", "options", "head"];

/// Returns true if `key` names an HTTP method (case-insensitive).
pub fn is_http_method(key: &str) -> bool {
    HTTP_METHODS.iter().any(|m| key.eq_ignore_ascii_case(m))
}

/// Returns the JSON type name for diagnostic messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// What an empty include specification means.
///
/// The two tools this one descends from disagreed: one substituted a
/// built-in tag list, the other kept everything. Neither is assumed
/// here; callers state what they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyIncludePolicy {
    /// No includes means no operation matches.
    #[default]
    MatchNone,
    /// No includes means every tagged operation matches
    /// (exclusions still apply).
    MatchAll,
}

/// Options for one filtering run.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// Raw include tags. A trailing `*` marks a prefix; known synonyms
    /// expand to extra exact entries.
    pub include: Vec<String>,
    /// Raw exclude tags, same syntax. Exclusion beats inclusion.
    pub exclude: Vec<String>,
    /// Inline `$ref`/`allOf` in operation schemas and re-prune afterwards.
    pub inline: bool,
    /// Behavior when `include` compiles to an empty specification.
    pub empty_include: EmptyIncludePolicy,
}

impl FilterOptions {
    /// Options with inlining enabled, the usual configuration.
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include,
            exclude,
            inline: true,
            empty_include: EmptyIncludePolicy::default(),
        }
    }

    /// Set whether operation schemas are inlined.
    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }

    /// Set the empty-include policy.
    pub fn empty_include(mut self, policy: EmptyIncludePolicy) -> Self {
        self.empty_include = policy;
        self
    }
}
