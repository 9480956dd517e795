//! On-demand aggregates behind the analysis charts and the data preview.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::OperationError;
use crate::table::{Table, Value};
use crate::validation::require_column;

/// Frequency of each non-null value, most frequent first.
///
/// Ties are ordered by ascending value.
pub fn value_counts(table: &Table, column: &str) -> Result<IndexMap<String, usize>, OperationError> {
    let column = require_column(table, column)?;

    let mut counts: HashMap<String, (&Value, usize)> = HashMap::new();
    for value in column.non_null() {
        counts.entry(value.to_string()).or_insert((value, 0)).1 += 1;
    }

    let mut entries: Vec<(String, (&Value, usize))> = counts.into_iter().collect();
    entries.sort_by(|(_, (a, count_a)), (_, (b, count_b))| {
        count_b.cmp(count_a).then_with(|| a.sort_cmp(b))
    });

    Ok(entries
        .into_iter()
        .map(|(key, (_, count))| (key, count))
        .collect())
}

/// One cell of a two-column frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossCount {
    pub x: String,
    pub y: String,
    pub count: usize,
}

/// Frequencies of every `(x, y)` pair where both cells are present.
///
/// Sorted by `x`, then `y`.
pub fn crosstab(table: &Table, x: &str, y: &str) -> Result<Vec<CrossCount>, OperationError> {
    let xs = require_column(table, x)?;
    let ys = require_column(table, y)?;

    let mut counts: HashMap<(String, String), (&Value, &Value, usize)> = HashMap::new();
    for (a, b) in xs.values().iter().zip(ys.values()) {
        if a.is_null() || b.is_null() {
            continue;
        }
        counts
            .entry((a.to_string(), b.to_string()))
            .or_insert((a, b, 0))
            .2 += 1;
    }

    let mut cells: Vec<((String, String), (&Value, &Value, usize))> = counts.into_iter().collect();
    cells.sort_by(|(_, (xa, ya, _)), (_, (xb, yb, _))| {
        xa.sort_cmp(xb).then_with(|| ya.sort_cmp(yb))
    });

    Ok(cells
        .into_iter()
        .map(|((x, y), (_, _, count))| CrossCount { x, y, count })
        .collect())
}

/// The first rows of a table, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Rows in the whole table.
    pub total_rows: usize,
}

/// Take at most `limit` leading rows.
pub fn preview(table: &Table, limit: usize) -> Preview {
    let shown = limit.min(table.row_count());
    Preview {
        columns: table.column_names().into_iter().map(str::to_string).collect(),
        rows: (0..shown)
            .filter_map(|i| table.row(i))
            .map(|row| row.into_iter().cloned().collect())
            .collect(),
        total_rows: table.row_count(),
    }
}
