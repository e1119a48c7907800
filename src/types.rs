//! Core types shared by the loader, extractor and reducer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix every local schema reference starts with.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Tag assigned to operations that declare none.
pub const NO_TAG: &str = "No tag";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// HTTP method an operation is bound to.
///
/// Serialized in lowercase, matching path item keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    /// All methods a path item may declare.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Trace,
    ];

    /// Parse a path item key.
    ///
    /// Returns `None` for keys that are not operations (`parameters`, `summary`, `x-*`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    /// Returns the path item key for this method.
    pub fn as_key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key().to_uppercase())
    }
}

/// What to do when a schema reference names a schema missing from `components.schemas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnresolvedRefs {
    /// Drop the name from closures and log a warning.
    #[default]
    Tolerate,
    /// Fail the load with `LoadError::UnresolvedReference`.
    Deny,
}

/// Options for loading a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LoadOptions {
    /// Policy for references to undefined schemas.
    pub unresolved_refs: UnresolvedRefs,
}

impl LoadOptions {
    /// Create load options with the tolerant reference policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on references to undefined schemas instead of dropping them.
    pub fn deny_unresolved(mut self, deny: bool) -> Self {
        self.unresolved_refs = if deny {
            UnresolvedRefs::Deny
        } else {
            UnresolvedRefs::Tolerate
        };
        self
    }
}
