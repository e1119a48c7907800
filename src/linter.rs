//! Document checks - static analysis of an OpenAPI document.
//!
//! Reports:
//! - JSON syntax errors and missing `openapi` marker
//! - `$ref`s to schemas missing from `components.schemas`
//! - Operations without an `operationId`, or sharing one
//! - Operations without tags
//!
//! Reduction follows only request/response body references, so running the
//! check on a reduced document surfaces references it could not see
//! (parameters, shared responses, ...).

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::extractor::escape_pointer;
use crate::loader::load_spec;
use crate::resolver::ref_target;
use crate::types::HttpMethod;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// JSON Pointer to the issue (e.g., "/paths/~1pets/get")
    pub path: String,
    pub message: String,
}

/// Overall status of a checked document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
    Warning,
}

/// Result of checking one document.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub errors: usize,
    pub warnings: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics.len() - errors;

        let status = if errors > 0 {
            CheckStatus::Error
        } else if warnings > 0 {
            CheckStatus::Warning
        } else {
            CheckStatus::Ok
        };

        Self {
            status,
            errors,
            warnings,
            diagnostics,
        }
    }

    /// Returns true if no errors were found.
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Check a document file.
///
/// Load failures become a single `E001` diagnostic rather than an error.
pub fn check_file(file: &Path) -> CheckResult {
    match load_spec(file) {
        Ok(document) => check(&document),
        Err(e) => CheckResult::from_diagnostics(vec![Diagnostic {
            severity: Severity::Error,
            code: "E001".to_string(),
            path: "/".to_string(),
            message: format!("cannot load document: {}", e),
        }]),
    }
}

/// Check a parsed document.
pub fn check(document: &Value) -> CheckResult {
    let mut diagnostics = Vec::new();

    check_refs(document, document, "", &mut diagnostics);
    check_operations(document, &mut diagnostics);

    CheckResult::from_diagnostics(diagnostics)
}

/// Recursively check schema `$ref` values resolve.
fn check_refs(value: &Value, root: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_val)) = map.get("$ref") {
                // Only the schema name segment matters; deeper pointers are not followed.
                if let Some(name) = ref_target(ref_val) {
                    if root
                        .pointer("/components/schemas")
                        .and_then(|schemas| schemas.get(name))
                        .is_none()
                    {
                        diagnostics.push(Diagnostic {
                            severity: Severity::Error,
                            code: "E002".to_string(),
                            path: format!("{}/$ref", path),
                            message: format!("schema not found: {}", name),
                        });
                    }
                }
            }

            for (key, val) in map {
                let child_path = format!("{}/{}", path, escape_pointer(key));
                check_refs(val, root, &child_path, diagnostics);
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                let child_path = format!("{}/{}", path, i);
                check_refs(item, root, &child_path, diagnostics);
            }
        }
        _ => {}
    }
}

/// Check operation identifiers and tags.
fn check_operations(document: &Value, diagnostics: &mut Vec<Diagnostic>) {
    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return;
    };

    let mut seen: HashMap<&str, String> = HashMap::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for (key, operation) in item {
            let Some(method) = HttpMethod::parse(key) else {
                continue;
            };
            let pointer = format!("/paths/{}/{}", escape_pointer(path), key);

            match operation
                .get("operationId")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
            {
                None => diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    code: "E003".to_string(),
                    path: pointer.clone(),
                    message: format!("{} {} has no operationId", method, path),
                }),
                Some(id) => {
                    if let Some(first) = seen.get(id) {
                        diagnostics.push(Diagnostic {
                            severity: Severity::Error,
                            code: "E004".to_string(),
                            path: format!("{}/operationId", pointer),
                            message: format!("duplicate operationId \"{}\" (first declared at {})", id, first),
                        });
                    } else {
                        seen.insert(id, pointer.clone());
                    }
                }
            }

            let has_tag = operation
                .get("tags")
                .and_then(Value::as_array)
                .and_then(|tags| tags.first())
                .and_then(Value::as_str)
                .is_some();
            if !has_tag {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W001".to_string(),
                    path: pointer,
                    message: format!("{} {} has no tags", method, path),
                });
            }
        }
    }
}
