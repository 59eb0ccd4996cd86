//! Pipeline integration tests: tag filtering, pruning, inlining, and
//! the end-to-end properties the transformation guarantees.

use oas_trim::{
    collect_refs, filter_document, parse_local_ref, prune_components, EmptyIncludePolicy,
    FilterOptions,
};
use serde_json::{json, Map, Value};

/// A small inventory-style document exercising every schema site:
/// parameter schemas, request bodies, responses, composition, and a
/// shared base record.
fn inventory_doc() -> Value {
    json!({
        "openapi": "3.0.1",
        "info": { "title": "Inventory", "version": "1.0" },
        "servers": [ { "url": "https://api.example.com" } ],
        "tags": [
            { "name": "StockItem", "description": "Stock item master" },
            { "name": "SalesOrder" },
            { "name": "Internal" }
        ],
        "paths": {
            "/stock-items": {
                "get": {
                    "tags": ["StockItem"],
                    "parameters": [
                        { "name": "filter", "in": "query",
                          "schema": { "$ref": "#/components/schemas/StockFilter" } }
                    ],
                    "responses": { "200": { "content": { "application/json": {
                        "schema": { "type": "array",
                                    "items": { "$ref": "#/components/schemas/StockItem" } }
                    }}}}
                },
                "put": {
                    "tags": ["StockItem"],
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/StockItem" }
                    }}},
                    "responses": { "204": { "description": "updated" } }
                }
            },
            "/sales-orders": {
                "post": {
                    "tags": ["SalesOrder"],
                    "requestBody": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/SalesOrder" }
                    }}},
                    "responses": { "201": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/SalesOrder" }
                    }}}}
                }
            },
            "/audit": {
                "get": {
                    "tags": ["Internal"],
                    "responses": { "200": { "content": { "application/json": {
                        "schema": { "$ref": "#/components/schemas/AuditRecord" }
                    }}}}
                }
            }
        },
        "components": {
            "schemas": {
                "BaseRecord": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "note": { "type": "string" }
                    },
                    "required": ["id"]
                },
                "StockItem": {
                    "allOf": [
                        { "$ref": "#/components/schemas/BaseRecord" },
                        { "type": "object",
                          "properties": {
                              "sku": { "type": "string" },
                              "site": { "$ref": "#/components/schemas/Warehouse" }
                          },
                          "required": ["sku"] }
                    ]
                },
                "Warehouse": {
                    "type": "object",
                    "properties": { "code": { "type": "string" } }
                },
                "StockFilter": { "type": "string" },
                "SalesOrder": {
                    "type": "object",
                    "properties": {
                        "lines": { "type": "array",
                                   "items": { "$ref": "#/components/schemas/OrderLine" } }
                    }
                },
                "OrderLine": {
                    "type": "object",
                    "properties": { "sku": { "type": "string" } }
                },
                "AuditRecord": { "type": "object" }
            }
        }
    })
}

fn include(tags: &[&str]) -> FilterOptions {
    FilterOptions::new(tags.iter().map(|s| s.to_string()).collect(), vec![])
}

fn schema_names(document: &Value) -> Vec<String> {
    document
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
        .map(|s| s.keys().cloned().collect())
        .unwrap_or_default()
}

mod operation_filtering {
    use super::*;

    #[test]
    fn single_tag_keeps_one_path() {
        let outcome = filter_document(&inventory_doc(), &include(&["StockItem"])).unwrap();
        let paths = outcome.document["paths"].as_object().unwrap();
        assert_eq!(paths.keys().collect::<Vec<_>>(), vec!["/stock-items"]);
        assert_eq!(outcome.summary.operations, 2);
    }

    #[test]
    fn multiple_tags_union() {
        let outcome =
            filter_document(&inventory_doc(), &include(&["StockItem", "SalesOrder"])).unwrap();
        let paths = outcome.document["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains_key("/stock-items"));
        assert!(paths.contains_key("/sales-orders"));
    }

    #[test]
    fn exclusion_beats_inclusion() {
        let opts = FilterOptions::new(
            vec!["StockItem".into(), "SalesOrder".into()],
            vec!["salesorder".into()],
        );
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        let paths = outcome.document["paths"].as_object().unwrap();
        assert_eq!(paths.keys().collect::<Vec<_>>(), vec!["/stock-items"]);
    }

    #[test]
    fn prefix_wildcard_matches_family() {
        let outcome = filter_document(&inventory_doc(), &include(&["s*"])).unwrap();
        let paths = outcome.document["paths"].as_object().unwrap();
        // StockItem and SalesOrder both start with "s"; Internal does not.
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn match_all_policy_keeps_everything_tagged() {
        let opts = FilterOptions::new(vec![], vec![])
            .empty_include(EmptyIncludePolicy::MatchAll);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        assert_eq!(outcome.document["paths"].as_object().unwrap().len(), 3);
    }

    #[test]
    fn match_all_policy_respects_exclusions() {
        let opts = FilterOptions::new(vec![], vec!["Internal".into()])
            .empty_include(EmptyIncludePolicy::MatchAll);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        let paths = outcome.document["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(!paths.contains_key("/audit"));
    }

    #[test]
    fn no_match_yields_empty_valid_document() {
        let outcome = filter_document(&inventory_doc(), &include(&["NoSuchTag"])).unwrap();
        assert!(outcome.document["paths"].as_object().unwrap().is_empty());
        assert!(outcome.document.get("components").is_none());
        assert!(outcome.document.get("tags").is_none());
        assert_eq!(outcome.document["info"]["title"], "Inventory");
    }
}

mod component_pruning {
    use super::*;

    #[test]
    fn closure_covers_exactly_the_reachable_set() {
        let opts = include(&["StockItem"]).inline(false);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        let mut names = schema_names(&outcome.document);
        names.sort();
        assert_eq!(
            names,
            vec!["BaseRecord", "StockFilter", "StockItem", "Warehouse"]
        );
    }

    #[test]
    fn unreachable_entries_never_survive() {
        let opts = include(&["SalesOrder"]).inline(false);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        let names = schema_names(&outcome.document);
        assert_eq!(names, vec!["SalesOrder", "OrderLine"]);
    }

    #[test]
    fn cyclic_references_retained_finitely() {
        // A references B, B references A, an operation references only A:
        // both survive, nothing loops.
        let spec = json!({
            "paths": { "/things": { "get": {
                "tags": ["Thing"],
                "responses": { "200": { "content": { "application/json": {
                    "schema": { "$ref": "#/components/schemas/A" }
                }}}}
            }}},
            "components": { "schemas": {
                "A": { "properties": { "b": { "$ref": "#/components/schemas/B" } } },
                "B": { "properties": { "a": { "$ref": "#/components/schemas/A" } } },
                "C": { "type": "string" }
            }}
        });
        let opts = include(&["Thing"]).inline(false);
        let outcome = filter_document(&spec, &opts).unwrap();
        let mut names = schema_names(&outcome.document);
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn pruning_already_pruned_table_is_identity() {
        let opts = include(&["StockItem"]).inline(false);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();

        let pruned = outcome.document["components"].as_object().unwrap().clone();
        let repruned = prune_components(&pruned, &outcome.document["paths"]);
        assert_eq!(Value::Object(pruned), Value::Object(repruned));
    }

    #[test]
    fn refs_from_discarded_operations_do_not_leak() {
        // AuditRecord is only referenced by the excluded /audit path.
        let opts = include(&["StockItem", "SalesOrder"]).inline(false);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        assert!(!schema_names(&outcome.document).contains(&"AuditRecord".to_string()));
    }
}

mod schema_inlining {
    use super::*;

    /// Local refs remaining anywhere under the kept paths that still
    /// resolve against the document's own component table.
    fn resolvable_local_refs(document: &Value) -> Vec<String> {
        let empty = Map::new();
        let components = document
            .get("components")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        collect_refs(&document["paths"])
            .into_iter()
            .filter(|pointer| {
                parse_local_ref(pointer)
                    .and_then(|(section, name)| {
                        components.get(section)?.as_object()?.get(name)
                    })
                    .is_some()
            })
            .collect()
    }

    #[test]
    fn inlining_removes_local_indirection() {
        let outcome = filter_document(&inventory_doc(), &include(&["SalesOrder"])).unwrap();
        assert!(resolvable_local_refs(&outcome.document).is_empty());
    }

    #[test]
    fn composition_flattened_with_all_obligations() {
        let outcome = filter_document(&inventory_doc(), &include(&["StockItem"])).unwrap();
        let schema = &outcome.document["paths"]["/stock-items"]["put"]["requestBody"]["content"]
            ["application/json"]["schema"];
        assert!(schema.get("allOf").is_none());
        assert!(schema.get("$ref").is_none());
        // Properties from both branches, required union in first-seen order.
        assert!(schema["properties"].get("id").is_some());
        assert!(schema["properties"].get("sku").is_some());
        assert_eq!(schema["required"], json!(["id", "sku"]));
        // Nested ref inside a branch property resolved too.
        assert_eq!(schema["properties"]["site"]["properties"]["code"]["type"], "string");
    }

    #[test]
    fn array_items_inlined() {
        let outcome = filter_document(&inventory_doc(), &include(&["StockItem"])).unwrap();
        let schema = &outcome.document["paths"]["/stock-items"]["get"]["responses"]["200"]
            ["content"]["application/json"]["schema"];
        assert_eq!(schema["type"], "array");
        assert!(schema["items"].get("$ref").is_none());
        assert!(schema["items"]["properties"].get("sku").is_some());
    }

    #[test]
    fn reprune_is_subset_of_pruned() {
        let doc = inventory_doc();
        let before = filter_document(&doc, &include(&["StockItem"]).inline(false)).unwrap();
        let after = filter_document(&doc, &include(&["StockItem"])).unwrap();

        let kept_before = schema_names(&before.document);
        let kept_after = schema_names(&after.document);
        assert!(kept_after.iter().all(|name| kept_before.contains(name)));
        assert!(kept_after.len() <= kept_before.len());
        // This document fully inlines, so nothing is left at all.
        assert!(kept_after.is_empty());
    }

    #[test]
    fn external_refs_survive_inlining() {
        let spec = json!({
            "paths": { "/ext": { "get": {
                "tags": ["Ext"],
                "responses": { "200": { "content": { "application/json": {
                    "schema": { "$ref": "https://example.com/remote.json#/Thing" }
                }}}}
            }}}
        });
        let outcome = filter_document(&spec, &include(&["Ext"])).unwrap();
        let schema = &outcome.document["paths"]["/ext"]["get"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["$ref"], "https://example.com/remote.json#/Thing");
    }

    #[test]
    fn dangling_local_ref_survives_inlining_and_pruning() {
        let spec = json!({
            "paths": { "/x": { "get": {
                "tags": ["A"],
                "responses": { "200": { "content": { "application/json": {
                    "schema": { "$ref": "#/components/schemas/Missing" }
                }}}}
            }}},
            "components": { "schemas": { "Other": {} } }
        });
        let outcome = filter_document(&spec, &include(&["A"])).unwrap();
        let schema = &outcome.document["paths"]["/x"]["get"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["$ref"], "#/components/schemas/Missing");
        assert!(outcome.document.get("components").is_none());
    }

    #[test]
    fn cyclic_schema_pipeline_terminates() {
        let spec = json!({
            "paths": { "/nodes": { "get": {
                "tags": ["Node"],
                "responses": { "200": { "content": { "application/json": {
                    "schema": { "$ref": "#/components/schemas/Node" }
                }}}}
            }}},
            "components": { "schemas": {
                "Node": { "type": "object", "properties": {
                    "next": { "$ref": "#/components/schemas/Node" }
                }}
            }}
        });
        let outcome = filter_document(&spec, &include(&["Node"])).unwrap();
        let schema = &outcome.document["paths"]["/nodes"]["get"]["responses"]["200"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["type"], "object");
        // The cycle is cut at the depth cap, so a residual ref keeps the
        // component alive through the re-prune.
        assert!(schema_names(&outcome.document).contains(&"Node".to_string()));
    }
}

mod tag_echo {
    use super::*;

    #[test]
    fn echo_keeps_matching_entries_with_metadata() {
        let outcome = filter_document(&inventory_doc(), &include(&["StockItem"])).unwrap();
        let tags = outcome.document["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0]["name"], "StockItem");
        assert_eq!(tags[0]["description"], "Stock item master");
    }

    #[test]
    fn echo_respects_prefix_and_exclusion() {
        let opts = FilterOptions::new(vec!["s*".into()], vec!["SalesOrder".into()]);
        let outcome = filter_document(&inventory_doc(), &opts).unwrap();
        let tags = outcome.document["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0]["name"], "StockItem");
    }
}

mod synonyms {
    use super::*;

    #[test]
    fn warehouse_includes_item_warehouse() {
        let spec = json!({
            "paths": {
                "/warehouses": { "get": { "tags": ["Warehouse"] } },
                "/item-warehouses": { "get": { "tags": ["ItemWarehouse"] } },
                "/other": { "get": { "tags": ["Other"] } }
            }
        });
        let outcome = filter_document(&spec, &include(&["Warehouse"])).unwrap();
        let paths = outcome.document["paths"].as_object().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains_key("/warehouses"));
        assert!(paths.contains_key("/item-warehouses"));
    }

    #[test]
    fn misspelling_maps_to_canonical() {
        let spec = json!({
            "paths": { "/opportunities": { "get": { "tags": ["Opportunity"] } } }
        });
        let outcome = filter_document(&spec, &include(&["Oportunity"])).unwrap();
        assert_eq!(outcome.document["paths"].as_object().unwrap().len(), 1);
    }
}
