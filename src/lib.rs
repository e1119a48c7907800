//! OpenAPI Reducer
//!
//! Reduce a large OpenAPI 3.x document to a chosen subset of operations plus
//! every schema those operations transitively depend on.
//!
//! # Example
//!
//! ```
//! use openapi_reduce::{LoadOptions, LoadedSpec, SelectionSet};
//!
//! let raw = r##"{
//!     "openapi": "3.0.1",
//!     "info": { "title": "Petstore", "version": "1.0.0" },
//!     "paths": {
//!         "/pets/{id}": {
//!             "get": {
//!                 "operationId": "getPet",
//!                 "responses": {
//!                     "200": { "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
//!                 }
//!             }
//!         },
//!         "/stores": {
//!             "get": { "operationId": "listStores", "responses": {} }
//!         }
//!     },
//!     "components": {
//!         "schemas": {
//!             "Pet": { "type": "object", "properties": { "tag": { "$ref": "#/components/schemas/Tag" } } },
//!             "Tag": { "type": "string" },
//!             "Store": { "type": "object" }
//!         }
//!     }
//! }"##;
//!
//! let spec = LoadedSpec::parse(raw, &LoadOptions::new()).unwrap();
//! let selection: SelectionSet = ["getPet"].into_iter().collect();
//! let reduced = spec.reduce(&selection).unwrap();
//!
//! // Only the selected path survives, with Pet and the Tag it references
//! assert!(reduced.document["paths"].get("/stores").is_none());
//! assert!(reduced.document["components"]["schemas"].get("Tag").is_some());
//! assert!(reduced.document["components"]["schemas"].get("Store").is_none());
//! ```
//!
//! # Dependency Rules
//!
//! | Source | Contributes |
//! |--------|-------------|
//! | `requestBody.content.*.schema.$ref` | Seed schema |
//! | `responses.*.content.*.schema.$ref` | Seed schema |
//! | Inline schemas, parameters, `components.responses` | Nothing |
//! | `#/components/schemas/<Name>` anywhere in a schema body | Transitive dependency |
//!
//! References to schemas that are not defined are dropped by default; use
//! [`LoadOptions::deny_unresolved`] to reject such documents instead.

mod cache;
mod catalog;
mod error;
mod extractor;
mod index;
mod linter;
mod loader;
mod reducer;
mod resolver;
mod spec;
mod types;

pub use cache::SpecCache;
pub use catalog::OperationCatalog;
pub use error::{LoadError, ReduceError};
pub use extractor::{extract, extract_all, Operation};
pub use index::SchemaIndex;
pub use linter::{check, check_file, CheckResult, CheckStatus, Diagnostic, Severity};
pub use loader::{check_openapi, is_url, load_spec, load_spec_auto, load_spec_str};
pub use reducer::{reduce, schema_union, ReducedDocument, ReductionStats, SelectionSet};
pub use resolver::{closure, direct_refs};
pub use spec::LoadedSpec;
pub use types::{HttpMethod, LoadOptions, UnresolvedRefs, NO_TAG, SCHEMA_REF_PREFIX};

#[cfg(feature = "remote")]
pub use loader::load_spec_url;
