//! Dataset and column summaries derived from a table.

use std::fmt;
use std::mem::size_of;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::WorkingState;
use crate::table::{Column, ColumnType, Table, Value};

/// Column filter used to populate selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    All,
    Numerical,
    Categorical,
}

impl ColumnKind {
    /// Returns true if a column of this type belongs to the kind.
    pub fn includes(&self, dtype: ColumnType) -> bool {
        match self {
            ColumnKind::All => true,
            ColumnKind::Numerical => dtype.is_numeric(),
            ColumnKind::Categorical => dtype.is_categorical(),
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::All => write!(f, "all"),
            ColumnKind::Numerical => write!(f, "numerical"),
            ColumnKind::Categorical => write!(f, "categorical"),
        }
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ColumnKind::All),
            "numerical" | "numeric" => Ok(ColumnKind::Numerical),
            "categorical" => Ok(ColumnKind::Categorical),
            _ => Err(format!(
                "Unknown column kind: {}. Use all, numerical or categorical.",
                s
            )),
        }
    }
}

/// Per-column summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    /// Type label, as shown in the data-types table.
    pub dtype: &'static str,
    pub non_null: usize,
    pub nulls: usize,
    /// Share of null cells, 0-100.
    pub null_percentage: f64,
    /// Distinct non-null values.
    pub unique: usize,
}

impl ColumnSummary {
    /// Summarize one column.
    pub fn of(column: &Column) -> Self {
        let nulls = column.null_count();
        let null_percentage = if column.is_empty() {
            0.0
        } else {
            nulls as f64 / column.len() as f64 * 100.0
        };
        Self {
            name: column.name().to_string(),
            dtype: column.dtype().label(),
            non_null: column.len() - nulls,
            nulls,
            null_percentage,
            unique: column.distinct_count(),
        }
    }
}

/// Read-only projection of the working state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedView {
    /// Version of the working state this view was computed from.
    pub version: u64,
    pub modified: bool,
    pub row_count: usize,
    pub column_count: usize,
    pub total_missing: usize,
    /// Approximate in-memory size of the cells.
    pub memory_bytes: usize,
    pub columns: Vec<ColumnSummary>,
    #[serde(skip)]
    dtypes: Vec<ColumnType>,
}

impl DerivedView {
    /// Compute the view for a working state.
    pub fn compute(state: &WorkingState) -> Self {
        let table: &Table = &state.table;
        let columns: Vec<ColumnSummary> = table.columns().map(ColumnSummary::of).collect();

        Self {
            version: state.version,
            modified: state.modified,
            row_count: table.row_count(),
            column_count: table.column_count(),
            total_missing: columns.iter().map(|c| c.nulls).sum(),
            memory_bytes: memory_usage(table),
            dtypes: table.columns().map(Column::dtype).collect(),
            columns,
        }
    }

    /// Column names of the given kind, in table order.
    pub fn column_names(&self, kind: ColumnKind) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.dtypes)
            .filter(|(_, dtype)| kind.includes(**dtype))
            .map(|(c, _)| c.name.as_str())
            .collect()
    }

    /// Summary of one column.
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

fn memory_usage(table: &Table) -> usize {
    table
        .columns()
        .map(|c| {
            let heap: usize = c
                .values()
                .iter()
                .map(|v| match v {
                    Value::Text(s) => s.capacity(),
                    _ => 0,
                })
                .sum();
            c.name().len() + c.len() * size_of::<Value>() + heap
        })
        .sum()
}
