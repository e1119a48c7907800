//! Operation catalog - extracted operations indexed by `operationId`.

use std::collections::{BTreeMap, HashMap};

use crate::error::{LoadError, ReduceError};
use crate::extractor::Operation;

/// All operations of one document, keyed by `operationId`.
///
/// Immutable once built. Operations keep document order; the tag grouping
/// is derived on demand.
#[derive(Debug, Clone, Default)]
pub struct OperationCatalog {
    operations: Vec<Operation>,
    by_id: HashMap<String, usize>,
}

impl OperationCatalog {
    /// Build a catalog from extracted operations.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::MissingOperationId` for an operation without an
    /// identifier, or `LoadError::DuplicateOperation` when two operations
    /// share one.
    pub fn build(operations: Vec<Operation>) -> Result<Self, LoadError> {
        let mut by_id = HashMap::with_capacity(operations.len());
        for (position, operation) in operations.iter().enumerate() {
            let Some(id) = &operation.operation_id else {
                return Err(LoadError::MissingOperationId {
                    method: operation.method,
                    path: operation.path.clone(),
                });
            };
            if let Some(&first) = by_id.get(id) {
                let first: &Operation = &operations[first];
                return Err(LoadError::DuplicateOperation {
                    operation_id: id.clone(),
                    first: first.key(),
                    second: operation.key(),
                });
            }
            by_id.insert(id.clone(), position);
        }
        Ok(Self { operations, by_id })
    }

    /// Look up an operation by identifier.
    ///
    /// # Errors
    ///
    /// Returns `ReduceError::OperationNotFound` if no operation has this identifier.
    pub fn by_id(&self, operation_id: &str) -> Result<&Operation, ReduceError> {
        self.get(operation_id)
            .ok_or_else(|| ReduceError::OperationNotFound {
                operation_id: operation_id.to_string(),
            })
    }

    /// Look up an operation by identifier, if present.
    pub fn get(&self, operation_id: &str) -> Option<&Operation> {
        self.by_id
            .get(operation_id)
            .and_then(|&position| self.operations.get(position))
    }

    /// Returns true if an operation has this identifier.
    pub fn contains(&self, operation_id: &str) -> bool {
        self.by_id.contains_key(operation_id)
    }

    /// Operations grouped by tag, each group in document order.
    pub fn by_tag(&self) -> BTreeMap<&str, Vec<&Operation>> {
        let mut groups: BTreeMap<&str, Vec<&Operation>> = BTreeMap::new();
        for operation in &self.operations {
            groups.entry(operation.tag.as_str()).or_default().push(operation);
        }
        groups
    }

    /// Iterate over operations in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Iterate over operation identifiers in document order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(Operation::id)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
