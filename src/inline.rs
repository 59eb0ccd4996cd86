//! Schema inlining - resolves `$ref` pointers and flattens `allOf`
//! composition inside operation schemas.
//!
//! Inlining happens at the point of use only. The component table is
//! never rewritten; after inlining, pruning removes entries that lost
//! their last referrer.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::refs::component_pointer;

/// Recursion ceiling for a single schema.
///
/// Schema graphs can be cyclic through `properties` (A -> B -> A);
/// expansion past this depth returns the node unchanged instead of
/// overflowing the stack.
const MAX_INLINE_DEPTH: usize = 128;

/// Build a pointer -> schema index from a document's `components.schemas`.
pub fn schema_ref_index(document: &Value) -> HashMap<String, Value> {
    let mut index = HashMap::new();
    let Some(schemas) = document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
    else {
        return index;
    };
    for (name, schema) in schemas {
        index.insert(component_pointer("schemas", name), schema.clone());
    }
    index
}

/// Inline a single schema value against a pointer index.
///
/// - A resolvable `$ref` is fully replaced by its (recursively inlined)
///   target; an unresolvable one is returned unchanged.
/// - An `allOf` list is inlined branch by branch, merged, and the
///   merged result passed back through inlining, since a branch may
///   itself resolve to something that composes further.
/// - Otherwise `properties`, `items`, `additionalProperties`, and
///   `oneOf`/`anyOf`/`allOf` branch lists are recursed into; all other
///   fields copy unchanged.
pub fn inline_schema(schema: &Value, index: &HashMap<String, Value>) -> Value {
    inline_value(schema, index, 0)
}

fn inline_value(schema: &Value, index: &HashMap<String, Value>, depth: usize) -> Value {
    if depth > MAX_INLINE_DEPTH {
        return schema.clone();
    }
    let Some(map) = schema.as_object() else {
        return schema.clone();
    };

    if let Some(Value::String(target)) = map.get("$ref") {
        match index.get(target) {
            Some(resolved) => return inline_value(resolved, index, depth + 1),
            // External or dangling - leave the reference node intact.
            None => return schema.clone(),
        }
    }

    if let Some(Value::Array(branches)) = map.get("allOf") {
        let fragments: Vec<Value> = branches
            .iter()
            .map(|b| inline_value(b, index, depth + 1))
            .collect();
        let merged = merge_all_of(&fragments);
        return inline_value(&merged, index, depth + 1);
    }

    let mut out = Map::new();
    for (key, value) in map {
        let inlined = match key.as_str() {
            "properties" => match value.as_object() {
                Some(props) => Value::Object(
                    props
                        .iter()
                        .map(|(name, prop)| (name.clone(), inline_value(prop, index, depth + 1)))
                        .collect(),
                ),
                None => value.clone(),
            },
            "items" | "additionalProperties" => inline_value(value, index, depth + 1),
            "oneOf" | "anyOf" | "allOf" => match value.as_array() {
                Some(arr) => Value::Array(
                    arr.iter()
                        .map(|b| inline_value(b, index, depth + 1))
                        .collect(),
                ),
                None => value.clone(),
            },
            _ => value.clone(),
        };
        out.insert(key.clone(), inlined);
    }
    Value::Object(out)
}

/// Merge `allOf` fragments into one effective schema.
///
/// `properties` accumulate across fragments with later fragments
/// overwriting same-named entries; `required` accumulates in first-seen
/// order without duplicates; every other field copies in fragment order,
/// later fragments overwriting. Non-object fragments are skipped.
pub fn merge_all_of(fragments: &[Value]) -> Value {
    let mut result = Map::new();
    let mut properties = Map::new();
    let mut required: Vec<String> = Vec::new();

    for fragment in fragments {
        let Some(part) = fragment.as_object() else {
            continue;
        };
        if let Some(props) = part.get("properties").and_then(Value::as_object) {
            for (name, prop) in props {
                properties.insert(name.clone(), prop.clone());
            }
        }
        if let Some(req) = part.get("required").and_then(Value::as_array) {
            for field in req.iter().filter_map(Value::as_str) {
                if !required.iter().any(|r| r == field) {
                    required.push(field.to_string());
                }
            }
        }
        for (key, value) in part {
            if key == "properties" || key == "required" {
                continue;
            }
            result.insert(key.clone(), value.clone());
        }
    }

    if !properties.is_empty() {
        result.insert("properties".to_string(), Value::Object(properties));
    }
    if !required.is_empty() {
        result.insert(
            "required".to_string(),
            Value::Array(required.into_iter().map(Value::String).collect()),
        );
    }
    Value::Object(result)
}

/// Inline every operation schema in a document's `paths`.
///
/// Covers parameter schemas, request-body media-type schemas, and
/// response media-type schemas. The component table is left untouched.
pub fn inline_path_schemas(document: &mut Value) {
    let index = schema_ref_index(document);
    let Some(paths) = document.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };
    for path_item in paths.values_mut() {
        let Some(operations) = path_item.as_object_mut() else {
            continue;
        };
        for operation in operations.values_mut() {
            let Some(op) = operation.as_object_mut() else {
                continue;
            };

            if let Some(Value::Array(params)) = op.get_mut("parameters") {
                for param in params.iter_mut() {
                    let Some(param) = param.as_object_mut() else {
                        continue;
                    };
                    if let Some(schema) = param.get("schema") {
                        let inlined = inline_schema(schema, &index);
                        param.insert("schema".to_string(), inlined);
                    }
                }
            }

            if let Some(body) = op.get_mut("requestBody").and_then(Value::as_object_mut) {
                inline_content_schemas(body.get_mut("content"), &index);
            }

            if let Some(responses) = op.get_mut("responses").and_then(Value::as_object_mut) {
                for response in responses.values_mut() {
                    if let Some(response) = response.as_object_mut() {
                        inline_content_schemas(response.get_mut("content"), &index);
                    }
                }
            }
        }
    }
}

fn inline_content_schemas(content: Option<&mut Value>, index: &HashMap<String, Value>) {
    let Some(content) = content.and_then(Value::as_object_mut) else {
        return;
    };
    for media in content.values_mut() {
        let Some(media) = media.as_object_mut() else {
            continue;
        };
        if let Some(schema) = media.get("schema") {
            let inlined = inline_schema(schema, index);
            media.insert("schema".to_string(), inlined);
        }
    }
}
