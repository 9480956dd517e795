//! Column type tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar type carried by every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values (true/false), produced by one-hot encoding.
    Boolean,
    /// Free text values.
    String,
    /// Text labels drawn from a small set.
    Categorical,
    /// Date and time values.
    DateTime,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }

    /// Returns true if this type is expanded by one-hot encoding.
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::String | ColumnType::Categorical)
    }

    /// Label shown in dtype summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::String => "string",
            ColumnType::Categorical => "categorical",
            ColumnType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
