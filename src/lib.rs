//! OpenAPI document reduction by operation tag.
//!
//! Takes a large API description and produces a self-contained subset:
//! only the operations whose tags match the requested specification,
//! only the components those operations transitively reference, and -
//! by default - operation schemas with every local `$ref` and `allOf`
//! flattened into inline, ref-free definitions.
//!
//! # Example
//!
//! ```
//! use oas_trim::{filter_document, FilterOptions};
//! use serde_json::json;
//!
//! let spec = json!({
//!     "paths": {
//!         "/items": {
//!             "get": { "tags": ["StockItem"] },
//!             "post": { "tags": ["Other"] }
//!         }
//!     }
//! });
//!
//! let options = FilterOptions::new(vec!["StockItem".into()], vec![]);
//! let outcome = filter_document(&spec, &options).unwrap();
//!
//! // Only the matching operation survives.
//! assert!(outcome.document["paths"]["/items"].get("get").is_some());
//! assert!(outcome.document["paths"]["/items"].get("post").is_none());
//! ```
//!
//! # Tag Specification
//!
//! | Raw tag | Compiles to | Matches |
//! |---------|-------------|---------|
//! | `StockItem` | exact `stockitem` | `StockItem` only |
//! | `sales*` | prefix `sales` | `SalesOrder`, `Salesperson`, ... |
//! | `Warehouse` | exact `warehouse`, `itemwarehouse` | either synonym |
//!
//! Matching is case-insensitive; exclusion always beats inclusion; an
//! operation with no tags never matches.
//!
//! # Pipeline
//!
//! Filter operations -> prune components to the reachable closure ->
//! (optionally) inline operation schemas -> prune again, since inlining
//! can strand entries. Dangling and non-local references degrade
//! locally; only an unparseable input is fatal.

mod check;
mod error;
mod inline;
mod loader;
mod pipeline;
mod prune;
mod refs;
mod tags;
mod types;

pub use check::{check_document, CheckResult, Diagnostic, Severity};
pub use error::DocumentError;
pub use inline::{inline_path_schemas, inline_schema, merge_all_of, schema_ref_index};
pub use loader::{is_url, load_document, load_document_auto, load_document_str, render_document, write_document};
pub use pipeline::{filter_document, FilterOutcome, FilterSummary};
pub use prune::prune_components;
pub use refs::{collect_refs, component_pointer, parse_local_ref, COMPONENTS_PREFIX};
pub use tags::{build_tag_sets, split_tag_args, TagMatcher, TagSets};
pub use types::{is_http_method, json_type_name, EmptyIncludePolicy, FilterOptions, HTTP_METHODS};

#[cfg(feature = "remote")]
pub use loader::load_document_url;
