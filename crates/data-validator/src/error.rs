//! Validation Error Types

use thiserror::Error;

/// Errors raised when a caller-supplied value is outside its allowed range
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value must be zero or greater
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// Value must be strictly greater than zero
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// NaN or infinite input
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Errors about the shape of a dataset after normalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A canonical column is absent
    #[error("dataset has no '{column}' column (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// A row's width differs from the header's
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Errors while parsing CSV text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsvError {
    /// Header line could not be read
    #[error("failed to read headers: {0}")]
    Headers(String),

    /// A data record could not be read
    #[error("row {row}: {message}")]
    Record { row: usize, message: String },

    /// Parsed rows do not form a table
    #[error(transparent)]
    Shape(#[from] SchemaError),
}

/// Errors while reading a dataset file
#[derive(Debug, Clone, Error)]
pub enum DatasetError {
    /// File could not be opened
    #[error("cannot read dataset {path}: {message}")]
    Io { path: String, message: String },

    /// File is not well-formed CSV
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: CsvError,
    },
}
