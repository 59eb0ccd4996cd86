//! Static document checks - shape errors and filter-relevant hazards.
//!
//! Reports, without mutating anything:
//! - structural problems that would make filtering meaningless (E001)
//! - local-form pointers with no target in the component table (W001)
//! - operations with no tags, invisible to any tag filter (W002)
//! - non-method keys under a path entry, dropped by filtering (W003)

use serde::Serialize;
use serde_json::Value;

use crate::refs::{collect_refs, parse_local_ref};
use crate::types::{is_http_method, json_type_name};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// JSON path to the issue (e.g., "/paths/~items/get").
    pub path: String,
    pub message: String,
}

/// Aggregated result of checking one document.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    /// Returns true if the document has no errors.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }

    /// Returns true if the run passes under the given strictness.
    pub fn passes(&self, strict: bool) -> bool {
        self.is_ok() && (!strict || self.warnings == 0)
    }
}

/// Check a parsed document.
pub fn check_document(document: &Value) -> CheckResult {
    let mut diagnostics = Vec::new();

    check_paths(document, &mut diagnostics);
    check_components_shape(document, &mut diagnostics);
    check_local_refs(document, &mut diagnostics);

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics.len() - errors;

    CheckResult {
        errors,
        warnings,
        diagnostics,
    }
}

fn error(code: &str, path: String, message: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        code: code.to_string(),
        path,
        message,
    }
}

fn warning(code: &str, path: String, message: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Warning,
        code: code.to_string(),
        path,
        message,
    }
}

fn check_paths(document: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(paths) = document.get("paths") else {
        return;
    };
    let Some(paths) = paths.as_object() else {
        diagnostics.push(error(
            "E001",
            "/paths".to_string(),
            format!("expected object, got {}", json_type_name(paths)),
        ));
        return;
    };

    for (path, entry) in paths {
        let Some(methods) = entry.as_object() else {
            diagnostics.push(error(
                "E001",
                format!("/paths/{path}"),
                format!("expected object, got {}", json_type_name(entry)),
            ));
            continue;
        };
        for (method, operation) in methods {
            if !is_http_method(method) {
                diagnostics.push(warning(
                    "W003",
                    format!("/paths/{path}/{method}"),
                    "not an HTTP method; dropped by filtering".to_string(),
                ));
                continue;
            }
            let Some(op) = operation.as_object() else {
                continue;
            };
            let tag_count = op
                .get("tags")
                .and_then(Value::as_array)
                .map(Vec::len)
                .unwrap_or(0);
            if tag_count == 0 {
                diagnostics.push(warning(
                    "W002",
                    format!("/paths/{path}/{method}"),
                    "operation has no tags and cannot match any tag filter".to_string(),
                ));
            }
        }
    }
}

fn check_components_shape(document: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(components) = document.get("components") else {
        return;
    };
    let Some(sections) = components.as_object() else {
        diagnostics.push(error(
            "E001",
            "/components".to_string(),
            format!("expected object, got {}", json_type_name(components)),
        ));
        return;
    };
    for (section, entries) in sections {
        if !entries.is_object() {
            diagnostics.push(error(
                "E001",
                format!("/components/{section}"),
                format!("expected object, got {}", json_type_name(entries)),
            ));
        }
    }
}

fn check_local_refs(document: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let empty = serde_json::Map::new();
    let components = document
        .get("components")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    for pointer in collect_refs(document) {
        // Non-local pointers are inert data, never diagnosed.
        let Some((section, name)) = parse_local_ref(&pointer) else {
            continue;
        };
        let resolved = components
            .get(section)
            .and_then(Value::as_object)
            .map(|entries| entries.contains_key(name))
            .unwrap_or(false);
        if !resolved {
            diagnostics.push(warning(
                "W001",
                pointer.clone(),
                format!("unresolved local reference to components/{section}/{name}"),
            ));
        }
    }
}
