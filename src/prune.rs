//! Component pruning by reachability.
//!
//! Keeps only the component entries transitively referenced from the
//! filtered `paths` structure. The closure runs over a worklist with a
//! processed set, so cyclic reference graphs terminate with each
//! pointer visited at most once.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::refs::{collect_refs, component_pointer, parse_local_ref};

/// Prune a component table down to the entries reachable from `paths_root`.
///
/// `paths_root` is the filtered `paths` value only, not the whole
/// document: components referenced solely from discarded operations
/// must not keep their targets alive.
///
/// Unresolvable and non-local pointers contribute nothing to the
/// closure and are not an error. Sections whose value is not an object
/// are carried through verbatim; sections that end up empty are
/// dropped.
pub fn prune_components(components: &Map<String, Value>, paths_root: &Value) -> Map<String, Value> {
    let mut queue: Vec<String> = collect_refs(paths_root).into_iter().collect();
    let mut processed: BTreeSet<String> = BTreeSet::new();

    while let Some(pointer) = queue.pop() {
        if !processed.insert(pointer.clone()) {
            continue;
        }
        let Some(entry) = resolve_component(components, &pointer) else {
            continue;
        };
        for next in collect_refs(entry) {
            if !processed.contains(&next) {
                queue.push(next);
            }
        }
    }

    let mut pruned = Map::new();
    for (section, entries) in components {
        let Some(items) = entries.as_object() else {
            pruned.insert(section.clone(), entries.clone());
            continue;
        };
        let mut kept = Map::new();
        for (name, value) in items {
            if processed.contains(&component_pointer(section, name)) {
                kept.insert(name.clone(), value.clone());
            }
        }
        if !kept.is_empty() {
            pruned.insert(section.clone(), Value::Object(kept));
        }
    }
    pruned
}

/// Resolve a pointer against the component table.
///
/// Only local `#/components/<section>/<name>` pointers resolve; names
/// may contain slashes.
fn resolve_component<'a>(components: &'a Map<String, Value>, pointer: &str) -> Option<&'a Value> {
    let (section, name) = parse_local_ref(pointer)?;
    components.get(section)?.as_object()?.get(name)
}
