//! Transformation operations that can be applied to a table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::export::ExportKind;
use crate::table::Table;

/// How missing values are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    Mean,
    Median,
    Mode,
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStrategy::Mean => write!(f, "mean"),
            FillStrategy::Median => write!(f, "median"),
            FillStrategy::Mode => write!(f, "mode"),
        }
    }
}

/// Type a column can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    #[serde(rename = "int", alias = "integer")]
    Integer,
    #[serde(rename = "float")]
    Float,
    #[serde(rename = "str", alias = "string")]
    String,
    #[serde(rename = "category", alias = "categorical")]
    Categorical,
    #[serde(rename = "datetime")]
    DateTime,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Integer => write!(f, "int"),
            TargetType::Float => write!(f, "float"),
            TargetType::String => write!(f, "str"),
            TargetType::Categorical => write!(f, "category"),
            TargetType::DateTime => write!(f, "datetime"),
        }
    }
}

impl std::str::FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "int" | "integer" => Ok(TargetType::Integer),
            "float" => Ok(TargetType::Float),
            "str" | "string" => Ok(TargetType::String),
            "category" | "categorical" => Ok(TargetType::Categorical),
            "datetime" => Ok(TargetType::DateTime),
            _ => Err(format!(
                "Unknown type: {}. Use int, float, str, category or datetime.",
                s
            )),
        }
    }
}

/// A transformation operation requested against the working table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Remove every row where the column is null.
    DropNulls { column: String },

    /// Replace nulls with a statistic of the column.
    FillMissing { column: String, strategy: FillStrategy },

    /// Z-score every numeric column.
    Normalize,

    /// Equal-width discretization into integer labels.
    ///
    /// `bins` falls back to the configured default when omitted.
    Discretize {
        column: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bins: Option<usize>,
    },

    /// One-hot expand every categorical column except the target.
    Encode { target: String },

    /// Coerce a column to another type.
    ConvertType { column: String, target: TargetType },
}

impl Operation {
    /// Short machine name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::DropNulls { .. } => "drop_nulls",
            Operation::FillMissing { .. } => "fill_missing",
            Operation::Normalize => "normalize",
            Operation::Discretize { .. } => "discretize",
            Operation::Encode { .. } => "encode",
            Operation::ConvertType { .. } => "convert_type",
        }
    }

    /// Column the operation is aimed at, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Operation::DropNulls { column }
            | Operation::FillMissing { column, .. }
            | Operation::Discretize { column, .. }
            | Operation::ConvertType { column, .. } => Some(column.as_str()),
            Operation::Encode { target } => Some(target.as_str()),
            Operation::Normalize => None,
        }
    }

    /// Export naming context for the table this operation produces.
    pub fn export_kind(&self) -> ExportKind {
        match self {
            Operation::Normalize => ExportKind::Normalized,
            Operation::Discretize { .. } => ExportKind::Discretized,
            Operation::Encode { .. } => ExportKind::Encoded,
            _ => ExportKind::Cleaned,
        }
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            Operation::DropNulls { column } => format!("Drop rows with missing '{}'", column),
            Operation::FillMissing { column, strategy } => {
                format!("Fill missing '{}' with {}", column, strategy)
            }
            Operation::Normalize => "Z-score normalize numeric columns".to_string(),
            Operation::Discretize {
                column,
                bins: Some(bins),
            } => format!("Discretize '{}' into {} equal-width bins", column, bins),
            Operation::Discretize { column, bins: None } => {
                format!("Discretize '{}' into equal-width bins", column)
            }
            Operation::Encode { target } => {
                format!("One-hot encode categorical columns except '{}'", target)
            }
            Operation::ConvertType { column, target } => {
                format!("Convert '{}' to {}", column, target)
            }
        }
    }
}

/// Result of applying one operation.
#[derive(Debug, Clone)]
pub struct TransformOutcome {
    /// The new table version.
    pub table: Table,
    /// Status message for display.
    pub message: String,
    /// Number of rows removed or cells rewritten.
    pub values_changed: usize,
}

impl TransformOutcome {
    pub fn new(table: Table, message: impl Into<String>, values_changed: usize) -> Self {
        Self {
            table,
            message: message.into(),
            values_changed,
        }
    }
}
