//! Operation extraction - one record per (path, method) in `paths`.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LoadError;
use crate::index::{not_an_object, SchemaIndex};
use crate::resolver::{closure, ref_target};
use crate::types::{HttpMethod, UnresolvedRefs, NO_TAG};

/// One HTTP method bound to one path, with the schemas it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// `operationId` as declared. `None` if absent or empty.
    pub operation_id: Option<String>,
    pub method: HttpMethod,
    pub path: String,
    /// Empty when the operation declares no summary.
    pub summary: String,
    /// First declared tag, or `"No tag"`.
    pub tag: String,
    /// Transitively closed set of schema names.
    pub schemas: BTreeSet<String>,
}

impl Operation {
    /// The operation identifier, or `""` if none was declared.
    ///
    /// Operations held by an `OperationCatalog` always have one.
    pub fn id(&self) -> &str {
        self.operation_id.as_deref().unwrap_or_default()
    }

    /// Human-readable location, e.g. `GET /pets/{id}`.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Extract a single operation object.
///
/// Seeds are the direct `schema.$ref` of each media type under the request
/// body and every response; inline schemas contribute nothing. Seeds are
/// expanded to their closure over `index`.
///
/// # Errors
///
/// Returns `LoadError::InvalidDocument` if the operation is not an object, or
/// `LoadError::UnresolvedReference` under [`UnresolvedRefs::Deny`].
pub fn extract(
    path: &str,
    method: HttpMethod,
    operation: &Value,
    index: &SchemaIndex,
    policy: UnresolvedRefs,
) -> Result<Operation, LoadError> {
    let pointer = format!("/paths/{}/{}", escape_pointer(path), method.as_key());
    let op = operation
        .as_object()
        .ok_or_else(|| not_an_object(&pointer, operation))?;

    let mut seeds = BTreeSet::new();
    if let Some(body) = op.get("requestBody") {
        collect_content_refs(body, &mut seeds);
    }
    if let Some(responses) = op.get("responses").and_then(Value::as_object) {
        for response in responses.values() {
            collect_content_refs(response, &mut seeds);
        }
    }

    let operation_id = op
        .get("operationId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(String::from);

    let origin = match &operation_id {
        Some(id) => id.clone(),
        None => format!("{} {}", method, path),
    };
    let schemas = closure(seeds.iter().map(String::as_str), index, policy, &origin)?;

    Ok(Operation {
        operation_id,
        method,
        path: path.to_string(),
        summary: op
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        tag: first_tag(op).unwrap_or(NO_TAG).to_string(),
        schemas,
    })
}

/// Extract every operation under the document's `paths`, in document order.
///
/// Path item keys that are not HTTP methods (`parameters`, `summary`, `x-*`, ...)
/// are skipped. A document without `paths` has no operations.
///
/// # Errors
///
/// Returns `LoadError::InvalidDocument` if `paths` or a path item is not an
/// object, plus anything [`extract`] returns.
pub fn extract_all(
    document: &Value,
    index: &SchemaIndex,
    policy: UnresolvedRefs,
) -> Result<Vec<Operation>, LoadError> {
    let Some(paths) = document.get("paths") else {
        return Ok(Vec::new());
    };
    let paths = paths
        .as_object()
        .ok_or_else(|| not_an_object("/paths", paths))?;

    let mut operations = Vec::new();
    for (path, item) in paths {
        let item = item
            .as_object()
            .ok_or_else(|| not_an_object(&format!("/paths/{}", escape_pointer(path)), item))?;
        for (key, operation) in item {
            if let Some(method) = HttpMethod::parse(key) {
                operations.push(extract(path, method, operation, index, policy)?);
            }
        }
    }

    tracing::debug!(operations = operations.len(), "extracted operations");
    Ok(operations)
}

fn collect_content_refs(holder: &Value, seeds: &mut BTreeSet<String>) {
    let Some(content) = holder.get("content").and_then(Value::as_object) else {
        return;
    };
    for media_type in content.values() {
        let reference = media_type
            .get("schema")
            .and_then(|schema| schema.get("$ref"))
            .and_then(Value::as_str);
        if let Some(name) = reference.and_then(ref_target) {
            seeds.insert(name.to_string());
        }
    }
}

fn first_tag(op: &Map<String, Value>) -> Option<&str> {
    op.get("tags")?.as_array()?.first()?.as_str()
}

/// Escape a key for use as a JSON Pointer segment (RFC 6901).
pub(crate) fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
