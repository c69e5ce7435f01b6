//! Error types for layer-queries operations.
//!
//! Errors are grouped by concern: input validation, query-file persistence,
//! and the layer host. Every error is terminal for the single operation that
//! raised it; callers report it and carry on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for layer-queries operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid user input. Nothing was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The query file could not be read, parsed, or written.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The named query does not exist.
    #[error("Query not found: {0}")]
    QueryNotFound(String),

    /// The layer host rejected the request.
    #[error(transparent)]
    Host(#[from] HostError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Input validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Query name was empty.
    #[error("Query name cannot be empty")]
    EmptyName,

    /// Field name was empty.
    #[error("Field cannot be empty")]
    EmptyField,

    /// Value was empty.
    #[error("Value cannot be empty")]
    EmptyValue,

    /// Expression was empty.
    #[error("Expression cannot be empty")]
    EmptyExpression,

    /// One of the query builder inputs was left empty.
    #[error("Please fill out all fields to create a query")]
    IncompleteQuery,

    /// A test run is missing its field or value.
    #[error("Please select a field and value")]
    MissingFieldOrValue,

    /// Operator is not one of the supported comparison operators.
    #[error("Invalid operator '{0}'. Valid operators: =, >, <, >=, <=, !=, LIKE")]
    InvalidOperator(String),

    /// Expression does not have the `"field" op 'value'` shape.
    #[error("Cannot parse expression '{0}': expected \"field\" operator 'value'")]
    MalformedExpression(String),

    /// An action needed a selected item and none was given.
    #[error("Please select a {0}")]
    MissingSelection(&'static str),
}

/// Failures reading or writing a JSON document on disk.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Reading the file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the file failed.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a valid document.
    #[error("Malformed JSON in {}: {source}", path.display())]
    Malformed {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The in-memory document could not be serialized.
    #[error("Failed to serialize {}: {source}", path.display())]
    Serialize {
        /// File that was about to be written.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reported by a layer host.
#[derive(Debug, Error)]
pub enum HostError {
    /// No layer with the given name exists in the project.
    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    /// The layer has no field with the given name.
    #[error("Field '{field}' not found on layer '{layer}'")]
    FieldNotFound {
        /// Layer that was searched.
        layer: String,
        /// Field that was requested.
        field: String,
    },

    /// The host could not persist its project state.
    #[error("Project persistence failed: {0}")]
    Persistence(#[source] PersistenceError),
}

/// A specialized Result type for layer-queries operations.
pub type Result<T> = std::result::Result<T, Error>;
