//! Error types for the tabprep library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for tabprep operations.
#[derive(Debug, Error)]
pub enum TabprepError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Uploaded file is not a CSV file.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// Payload is not valid UTF-8 text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Table invariant violated (duplicate names, ragged columns, mistyped cells).
    #[error("Invalid table: {0}")]
    Shape(String),

    /// Export requested for a split that has not been performed.
    #[error("No train/test split has been performed yet")]
    NoSplit,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A transformation was refused.
    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Result type alias for tabprep operations.
pub type Result<T> = std::result::Result<T, TabprepError>;

/// Category of a refused transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No column or target was selected.
    EmptyInput,
    /// A value cannot be coerced to the requested type.
    TypeMismatch,
    /// The named column does not exist.
    ColumnNotFound,
    /// Mode fill on a column with no values.
    NoModeFound,
    /// Normalization on a table without numeric columns.
    NoNumericColumns,
    /// A parameter is out of range.
    InvalidParameter,
}

impl ErrorKind {
    /// Stable snake_case code, as serialized.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::EmptyInput => "empty_input",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::ColumnNotFound => "column_not_found",
            ErrorKind::NoModeFound => "no_mode_found",
            ErrorKind::NoNumericColumns => "no_numeric_columns",
            ErrorKind::InvalidParameter => "invalid_parameter",
        }
    }

    /// Silent kinds are dropped without any message.
    pub fn is_silent(&self) -> bool {
        matches!(self, ErrorKind::EmptyInput)
    }

    /// Informational kinds are reported to the user but are not failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, ErrorKind::NoNumericColumns)
    }
}

/// A transformation refused at the operator boundary.
///
/// The working state is never touched when one of these is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct OperationError {
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

impl OperationError {
    /// Create an error of the given kind.
    pub fn new(kind: ErrorKind, column: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            kind,
            column: column.map(str::to_string),
            message: message.into(),
        }
    }

    /// Nothing was selected.
    pub fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput, None, "")
    }

    /// The named column is absent from the table.
    pub fn column_not_found(column: &str) -> Self {
        Self::new(
            ErrorKind::ColumnNotFound,
            Some(column),
            format!("Column '{}' not found in data.", column),
        )
    }

    /// A value could not be coerced.
    pub fn type_mismatch(column: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, Some(column), message)
    }

    /// A parameter was out of range.
    pub fn invalid_parameter(column: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, column, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert!(ErrorKind::EmptyInput.is_silent());
        assert!(!ErrorKind::TypeMismatch.is_silent());
        assert!(ErrorKind::NoNumericColumns.is_informational());
        assert!(!ErrorKind::NoModeFound.is_informational());
    }

    #[test]
    fn test_kind_code_matches_serde() {
        for kind in [ErrorKind::TypeMismatch, ErrorKind::NoNumericColumns] {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, kind.code());
        }
    }

    #[test]
    fn test_operation_error_converts() {
        let err: TabprepError = OperationError::column_not_found("age").into();
        assert_eq!(err.to_string(), "Column 'age' not found in data.");
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = TabprepError::UnsupportedFormat("Please upload a CSV file.".to_string());
        assert_eq!(err.to_string(), "Please upload a CSV file.");
    }
}
