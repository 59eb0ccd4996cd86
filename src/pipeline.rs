//! Pipeline orchestration: filter operations by tag, prune components,
//! optionally inline operation schemas, re-prune, emit.
//!
//! Every stage consumes one document value and produces a new one; the
//! input is never mutated. All stages after the initial shape check are
//! total - incomplete or cyclic reference graphs degrade locally.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::DocumentError;
use crate::inline::inline_path_schemas;
use crate::prune::prune_components;
use crate::tags::{build_tag_sets, TagMatcher};
use crate::types::{is_http_method, json_type_name, FilterOptions};

/// Counts and compiled tag sets from one filtering run.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    /// Path entries with at least one surviving operation.
    pub paths: usize,
    /// Operations kept across all paths.
    pub operations: usize,
    /// Component entries kept after (re-)pruning.
    pub components: usize,
    pub include_exact: Vec<String>,
    pub include_prefix: Vec<String>,
    pub exclude_exact: Vec<String>,
    pub exclude_prefix: Vec<String>,
}

/// The filtered document plus its summary.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub document: Value,
    pub summary: FilterSummary,
}

/// Run the full transformation over a parsed document.
///
/// Stages: filter operations by tag, build the output skeleton (with
/// `openapi`/`info`/`servers` read through and a matching `tags` echo),
/// prune components to the entries reachable from the kept paths, then,
/// when enabled, inline operation schemas and prune again - inlining can
/// strand component entries, and empty tables are omitted entirely.
///
/// # Errors
///
/// Returns `DocumentError::NotAnObject` if the document root is not an
/// object. Everything else degrades into the shape of the output.
pub fn filter_document(
    spec: &Value,
    options: &FilterOptions,
) -> Result<FilterOutcome, DocumentError> {
    let root = spec.as_object().ok_or_else(|| DocumentError::NotAnObject {
        actual: json_type_name(spec).to_string(),
    })?;

    let matcher = TagMatcher::new(
        build_tag_sets(&options.include),
        build_tag_sets(&options.exclude),
        options.empty_include,
    );

    let (paths, operations) = filter_paths(root.get("paths"), &matcher);

    let empty = Map::new();
    let components = root
        .get("components")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let pruned = prune_components(components, &paths);

    let mut document = Map::new();
    document.insert(
        "openapi".to_string(),
        root.get("openapi").cloned().unwrap_or_else(|| json!("3.0.1")),
    );
    document.insert(
        "info".to_string(),
        root.get("info").cloned().unwrap_or_else(|| json!({})),
    );
    document.insert(
        "servers".to_string(),
        root.get("servers").cloned().unwrap_or_else(|| json!([])),
    );
    document.insert("paths".to_string(), paths);

    if let Some(kept) = echo_tags(root.get("tags"), &matcher) {
        document.insert("tags".to_string(), kept);
    }

    if !pruned.is_empty() {
        document.insert("components".to_string(), Value::Object(pruned));
    }

    let mut document = Value::Object(document);

    if options.inline {
        inline_path_schemas(&mut document);
        // Inlining can leave entries with zero referrers; re-prune
        // against the original table so the output stays minimal.
        let repruned = prune_components(components, &document["paths"]);
        if let Some(map) = document.as_object_mut() {
            if repruned.is_empty() {
                map.remove("components");
            } else {
                map.insert("components".to_string(), Value::Object(repruned));
            }
        }
    }

    let summary = summarize(&document, operations, &matcher);
    Ok(FilterOutcome { document, summary })
}

/// Keep operations whose method key is a known HTTP verb and whose tag
/// set contains at least one matching tag. Path entries survive only
/// with one or more kept operations.
fn filter_paths(paths: Option<&Value>, matcher: &TagMatcher) -> (Value, usize) {
    let mut filtered = Map::new();
    let mut operations = 0usize;

    let Some(paths) = paths.and_then(Value::as_object) else {
        return (Value::Object(filtered), operations);
    };

    for (path, entry) in paths {
        let Some(methods) = entry.as_object() else {
            continue;
        };
        let mut kept = Map::new();
        for (method, operation) in methods {
            if !is_http_method(method) {
                continue;
            }
            let Some(op) = operation.as_object() else {
                continue;
            };
            let matched = op
                .get("tags")
                .and_then(Value::as_array)
                .map(|tags| {
                    tags.iter()
                        .filter_map(Value::as_str)
                        .any(|t| matcher.matches(t))
                })
                .unwrap_or(false);
            if matched {
                kept.insert(method.clone(), operation.clone());
            }
        }
        if !kept.is_empty() {
            operations += kept.len();
            filtered.insert(path.clone(), Value::Object(kept));
        }
    }

    (Value::Object(filtered), operations)
}

/// Echo of top-level `tags` entries whose `name` matches.
///
/// Returns `None` when the input has no matching entries, so the key is
/// omitted rather than emitted empty.
fn echo_tags(tags: Option<&Value>, matcher: &TagMatcher) -> Option<Value> {
    let entries = tags?.as_array()?;
    let kept: Vec<Value> = entries
        .iter()
        .filter(|entry| {
            entry
                .get("name")
                .and_then(Value::as_str)
                .map(|name| matcher.matches(name))
                .unwrap_or(false)
        })
        .cloned()
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(Value::Array(kept))
    }
}

fn summarize(document: &Value, operations: usize, matcher: &TagMatcher) -> FilterSummary {
    let paths = document["paths"].as_object().map(Map::len).unwrap_or(0);
    let components = document
        .get("components")
        .and_then(Value::as_object)
        .map(|sections| {
            sections
                .values()
                .filter_map(Value::as_object)
                .map(Map::len)
                .sum()
        })
        .unwrap_or(0);

    FilterSummary {
        paths,
        operations,
        components,
        include_exact: sorted(&matcher.include().exact),
        include_prefix: sorted(&matcher.include().prefix),
        exclude_exact: sorted(&matcher.exclude().exact),
        exclude_prefix: sorted(&matcher.exclude().prefix),
    }
}

fn sorted(set: &BTreeSet<String>) -> Vec<String> {
    set.iter().cloned().collect()
}
