//! Reference collection and local pointer handling.
//!
//! A reference is an object carrying a string-valued `$ref` field. Only
//! pointers of the form `#/components/<section>/<name>` are local;
//! anything else (absolute URLs, file paths, other fragments) is inert
//! data that is collected but never resolved.

use std::collections::BTreeSet;

use serde_json::Value;

/// Prefix of local component pointers.
pub const COMPONENTS_PREFIX: &str = "#/components/";

/// Collect every `$ref` pointer string under `node`.
///
/// Recurses into all objects and arrays. Siblings of a `$ref` field are
/// still visited: a reference node may carry metadata that itself holds
/// further references. Scalars are skipped. Pure and deterministic.
pub fn collect_refs(node: &Value) -> BTreeSet<String> {
    let mut refs = BTreeSet::new();
    collect_into(node, &mut refs);
    refs
}

fn collect_into(node: &Value, refs: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("$ref") {
                refs.insert(target.clone());
            }
            for value in map.values() {
                collect_into(value, refs);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_into(item, refs);
            }
        }
        _ => {}
    }
}

/// Split a local pointer into `(section, name)`.
///
/// Component names may contain `/`; everything after the section
/// segment belongs to the name. Returns `None` for non-local pointers
/// and for pointers missing a section or name.
pub fn parse_local_ref(pointer: &str) -> Option<(&str, &str)> {
    let rest = pointer.strip_prefix(COMPONENTS_PREFIX)?;
    let (section, name) = rest.split_once('/')?;
    if section.is_empty() || name.is_empty() {
        return None;
    }
    Some((section, name))
}

/// Canonical pointer string for a component entry.
pub fn component_pointer(section: &str, name: &str) -> String {
    format!("{COMPONENTS_PREFIX}{section}/{name}")
}
