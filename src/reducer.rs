//! Document reduction - keep selected operations and the schemas they need.

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::OperationCatalog;
use crate::error::ReduceError;
use crate::types::HttpMethod;

/// Operation identifiers chosen by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every operation in the catalog.
    pub fn all(catalog: &OperationCatalog) -> Self {
        catalog.ids().collect()
    }

    /// Select every operation whose tag is one of `tags`.
    pub fn by_tags<S: AsRef<str>>(catalog: &OperationCatalog, tags: &[S]) -> Self {
        catalog
            .iter()
            .filter(|op| tags.iter().any(|tag| tag.as_ref() == op.tag))
            .map(|op| op.id())
            .collect()
    }

    /// Add an identifier. Returns false if it was already selected.
    pub fn insert(&mut self, operation_id: impl Into<String>) -> bool {
        self.ids.insert(operation_id.into())
    }

    pub fn contains(&self, operation_id: &str) -> bool {
        self.ids.contains(operation_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for SelectionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}

/// How much of the source document a reduction kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReductionStats {
    pub operations_selected: usize,
    pub operations_total: usize,
    pub schemas_selected: usize,
    pub schemas_total: usize,
}

/// A reduced OpenAPI document.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedDocument {
    pub document: Value,
    pub stats: ReductionStats,
}

impl ReducedDocument {
    pub fn into_value(self) -> Value {
        self.document
    }
}

/// Union of the schema sets of all selected operations.
///
/// # Errors
///
/// Returns `ReduceError::OperationNotFound` for the first identifier not in the catalog.
pub fn schema_union(
    catalog: &OperationCatalog,
    selection: &SelectionSet,
) -> Result<BTreeSet<String>, ReduceError> {
    let mut union = BTreeSet::new();
    for id in selection.iter() {
        union.extend(catalog.by_id(id)?.schemas.iter().cloned());
    }
    Ok(union)
}

/// Reduce `document` to the selected operations and the schemas they reach.
///
/// `paths` keeps only selected (path, method) entries, together with the
/// path-level fields (`parameters`, `summary`, ...) of each kept path.
/// `components.schemas` keeps only the schema union. Everything else is
/// copied unchanged and key order follows the source document. Neither
/// `document` nor `catalog` is modified.
///
/// # Errors
///
/// Returns `ReduceError::OperationNotFound` if the selection names an
/// operation not in the catalog. Nothing is produced in that case.
pub fn reduce(
    document: &Value,
    catalog: &OperationCatalog,
    selection: &SelectionSet,
) -> Result<ReducedDocument, ReduceError> {
    let mut kept: HashSet<(&str, HttpMethod)> = HashSet::with_capacity(selection.len());
    for id in selection.iter() {
        let operation = catalog.by_id(id)?;
        kept.insert((operation.path.as_str(), operation.method));
    }
    let schemas = schema_union(catalog, selection)?;

    let mut reduced = document.clone();
    let mut schemas_total = 0;

    if let Some(root) = reduced.as_object_mut() {
        let paths = document
            .get("paths")
            .and_then(Value::as_object)
            .map(|paths| reduce_paths(paths, &kept))
            .unwrap_or_default();
        root.insert("paths".to_string(), Value::Object(paths));

        let source = document
            .pointer("/components/schemas")
            .and_then(Value::as_object);
        let target = root
            .get_mut("components")
            .and_then(|components| components.get_mut("schemas"));
        if let (Some(source), Some(target)) = (source, target) {
            schemas_total = source.len();
            let filtered: Map<String, Value> = source
                .iter()
                .filter(|(name, _)| schemas.contains(name.as_str()))
                .map(|(name, schema)| (name.clone(), schema.clone()))
                .collect();
            *target = Value::Object(filtered);
        }
    }

    let stats = ReductionStats {
        operations_selected: selection.len(),
        operations_total: catalog.len(),
        schemas_selected: schemas.len(),
        schemas_total,
    };
    tracing::info!(
        operations = stats.operations_selected,
        operations_total = stats.operations_total,
        schemas = stats.schemas_selected,
        schemas_total = stats.schemas_total,
        "reduced document"
    );

    Ok(ReducedDocument {
        document: reduced,
        stats,
    })
}

fn reduce_paths(
    paths: &Map<String, Value>,
    kept: &HashSet<(&str, HttpMethod)>,
) -> Map<String, Value> {
    let mut result = Map::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        let selected = item
            .keys()
            .filter_map(|key| HttpMethod::parse(key))
            .any(|method| kept.contains(&(path.as_str(), method)));
        if !selected {
            continue;
        }

        let reduced_item: Map<String, Value> = item
            .iter()
            .filter(|(key, _)| match HttpMethod::parse(key) {
                Some(method) => kept.contains(&(path.as_str(), method)),
                // Path-level fields travel with the path.
                None => true,
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        result.insert(path.clone(), Value::Object(reduced_item));
    }
    result
}
