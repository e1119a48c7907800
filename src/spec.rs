//! A loaded document together with its schema index and operation catalog.

use serde_json::Value;

use crate::catalog::OperationCatalog;
use crate::error::{LoadError, ReduceError};
use crate::extractor::extract_all;
use crate::index::SchemaIndex;
use crate::loader::{check_openapi, load_spec_auto, load_spec_str};
use crate::reducer::{reduce, ReducedDocument, SelectionSet};
use crate::types::LoadOptions;

/// Everything the reducer needs from one source document.
#[derive(Debug, Clone)]
pub struct LoadedSpec {
    document: Value,
    schemas: SchemaIndex,
    catalog: OperationCatalog,
}

impl LoadedSpec {
    /// Parse and index a raw JSON document.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidJson` or `LoadError::NotOpenApi` for bad input,
    /// and catalog errors for missing or duplicate `operationId`s.
    pub fn parse(raw: &str, options: &LoadOptions) -> Result<Self, LoadError> {
        Self::from_value(load_spec_str(raw)?, options)
    }

    /// Load from a file path or URL.
    ///
    /// # Errors
    ///
    /// Same as [`LoadedSpec::parse`], plus IO and network errors.
    pub fn from_source(source: &str, options: &LoadOptions) -> Result<Self, LoadError> {
        Self::from_value(load_spec_auto(source)?, options)
    }

    /// Index an already parsed document.
    ///
    /// # Errors
    ///
    /// Same as [`LoadedSpec::parse`] except for JSON syntax errors.
    pub fn from_value(document: Value, options: &LoadOptions) -> Result<Self, LoadError> {
        let document = check_openapi(document)?;
        let schemas = SchemaIndex::build(&document)?;
        let operations = extract_all(&document, &schemas, options.unresolved_refs)?;
        let catalog = OperationCatalog::build(operations)?;

        tracing::debug!(
            operations = catalog.len(),
            schemas = schemas.len(),
            "loaded OpenAPI document"
        );
        Ok(Self {
            document,
            schemas,
            catalog,
        })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn schemas(&self) -> &SchemaIndex {
        &self.schemas
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    /// Reduce this document to `selection`.
    ///
    /// # Errors
    ///
    /// Returns `ReduceError::OperationNotFound` for identifiers not in the catalog.
    pub fn reduce(&self, selection: &SelectionSet) -> Result<ReducedDocument, ReduceError> {
        reduce(&self.document, &self.catalog, selection)
    }
}
