//! A single named, typed column.

use std::collections::HashSet;

use serde::Serialize;

use super::types::ColumnType;
use super::value::Value;

/// A named column holding nullable cells of one type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name (unique within a table).
    name: String,
    /// Type tag every non-null cell agrees with.
    dtype: ColumnType,
    /// Cells in row order.
    values: Vec<Value>,
}

impl Column {
    /// Create a column. Cell types are checked when the column joins a table.
    pub fn new(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> ColumnType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the column, returning its cells.
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Number of cells, nulls included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rename the column.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Iterate over non-null cells.
    pub fn non_null(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().filter(|v| !v.is_null())
    }

    /// Non-null numeric cells as floats.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(Value::as_f64).collect()
    }

    /// Number of distinct non-null values.
    pub fn distinct_count(&self) -> usize {
        self.non_null()
            .map(|v| v.to_string())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Distinct non-null values in ascending order.
    pub fn sorted_distinct(&self) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut distinct: Vec<Value> = self
            .non_null()
            .filter(|v| seen.insert(v.to_string()))
            .cloned()
            .collect();
        distinct.sort_by(Value::sort_cmp);
        distinct
    }

    /// Find the first cell that does not agree with the type tag.
    pub fn first_mistyped(&self) -> Option<(usize, &Value)> {
        self.values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.fits(self.dtype))
    }
}
