//! Schema index: `components.schemas` flattened for reference scanning.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::LoadError;
use crate::types::json_type_name;

/// Mapping from schema name to its serialized JSON definition.
///
/// Built once per document and never mutated. Bodies are kept in their
/// compact serialized form so reference scanning is a plain text search,
/// independent of how deeply a reference is nested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaIndex {
    bodies: BTreeMap<String, String>,
}

impl SchemaIndex {
    /// Build the index from a document's `components.schemas`.
    ///
    /// A document without `components` or without `schemas` yields an empty index.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::InvalidDocument` if either level is present but not an object.
    pub fn build(document: &Value) -> Result<Self, LoadError> {
        let Some(components) = document.get("components") else {
            return Ok(Self::default());
        };
        let components = components
            .as_object()
            .ok_or_else(|| not_an_object("/components", components))?;
        let Some(schemas) = components.get("schemas") else {
            return Ok(Self::default());
        };
        let schemas = schemas
            .as_object()
            .ok_or_else(|| not_an_object("/components/schemas", schemas))?;

        let mut bodies = BTreeMap::new();
        for (name, schema) in schemas {
            let body = serde_json::to_string(schema)
                .map_err(|source| LoadError::InvalidJson { source })?;
            bodies.insert(name.clone(), body);
        }

        tracing::debug!(schemas = bodies.len(), "built schema index");
        Ok(Self { bodies })
    }

    /// Serialized definition of a schema, if defined.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bodies.get(name).map(String::as_str)
    }

    /// Returns true if the schema is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.bodies.contains_key(name)
    }

    /// Number of schemas in the document.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Returns true if the document defines no schemas.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Iterate over schema names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }
}

pub(crate) fn not_an_object(path: &str, actual: &Value) -> LoadError {
    LoadError::InvalidDocument {
        path: path.to_string(),
        message: format!("expected object, got {}", json_type_name(actual)),
    }
}
