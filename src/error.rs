//! Error types for loading and reducing OpenAPI documents.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::HttpMethod;

/// Errors while loading a document and building its operation catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Format errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("not an OpenAPI document: missing top-level \"openapi\" field")]
    NotOpenApi,

    #[error("invalid document at {path}: {message}")]
    InvalidDocument { path: String, message: String },

    // Catalog errors (exit code 2)
    #[error("operation {method} {path} has no operationId")]
    MissingOperationId { method: HttpMethod, path: String },

    #[error("duplicate operationId \"{operation_id}\": declared by {first} and {second}")]
    DuplicateOperation {
        operation_id: String,
        first: String,
        second: String,
    },

    #[error("schema \"{schema}\" referenced from {referenced_from} is not defined in components.schemas")]
    UnresolvedReference {
        schema: String,
        referenced_from: String,
    },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during lookup and reduction against a built catalog.
#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("unknown operationId \"{operation_id}\"")]
    OperationNotFound { operation_id: String },
}

impl ReduceError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReduceError::OperationNotFound { .. } => 2,
        }
    }
}
