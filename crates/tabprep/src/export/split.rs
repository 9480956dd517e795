//! Seeded train/test splitting.

use std::sync::Arc;

use serde::Serialize;

use crate::error::OperationError;
use crate::table::{Table, Value};
use crate::transform::label_encode;
use crate::validation::require_column;

/// Absorbs representation error in `rows * fraction` before rounding up.
const SIZE_EPSILON: f64 = 1e-9;

/// Train and test partitions of one split invocation.
#[derive(Debug, Clone, Serialize)]
pub struct SplitResult {
    #[serde(skip)]
    pub train: Table,
    #[serde(skip)]
    pub test: Table,
    /// Label-encoded target column, last in both parts.
    pub target: String,
    /// Original target values, indexed by code.
    pub classes: Vec<Value>,
    pub test_fraction: f64,
    pub seed: u64,
}

impl SplitResult {
    /// `(rows, columns)` of the train part.
    pub fn train_shape(&self) -> (usize, usize) {
        (self.train.row_count(), self.train.column_count())
    }

    /// `(rows, columns)` of the test part.
    pub fn test_shape(&self) -> (usize, usize) {
        (self.test.row_count(), self.test.column_count())
    }

    /// Status line shown after a split.
    pub fn status_message(&self) -> String {
        let test_pct = (self.test_fraction * 100.0).round() as i64;
        let (train_rows, train_cols) = self.train_shape();
        let (test_rows, test_cols) = self.test_shape();
        format!(
            "Train/Test Split complete ({}/{}). Train shape: ({}, {}), Test shape: ({}, {})",
            100 - test_pct,
            test_pct,
            train_rows,
            train_cols,
            test_rows,
            test_cols
        )
    }
}

/// `(train, test)` row counts; the test part is `ceil(rows * fraction)`.
pub fn split_sizes(rows: usize, test_fraction: f64) -> (usize, usize) {
    let test = ((rows as f64 * test_fraction) - SIZE_EPSILON).ceil().max(0.0) as usize;
    let test = test.min(rows);
    (rows - test, test)
}

/// Label-encode `target`, shuffle rows with a fixed seed and partition them.
///
/// Test rows come first in the shuffled order. Both parts keep the shuffled
/// order and carry the target as their last column.
pub fn train_test_split(
    table: &Table,
    target: &str,
    test_fraction: f64,
    seed: u64,
) -> Result<SplitResult, OperationError> {
    let column = require_column(table, target)?;
    let (encoded, classes) = label_encode(column);

    let mut columns: Vec<Arc<_>> = table
        .shared_columns()
        .iter()
        .filter(|c| c.name() != target)
        .cloned()
        .collect();
    columns.push(Arc::new(encoded));
    let arranged = Table::from_shared(columns)
        .map_err(|e| OperationError::invalid_parameter(Some(target), e.to_string()))?;

    let rows = table.row_count();
    let (_, test_rows) = split_sizes(rows, test_fraction);

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = fastrand::Rng::with_seed(seed);
    rng.shuffle(&mut indices);
    let (test_idx, train_idx) = indices.split_at(test_rows);

    Ok(SplitResult {
        train: arranged.take_rows(train_idx),
        test: arranged.take_rows(test_idx),
        target: target.to_string(),
        classes,
        test_fraction,
        seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnType};

    fn hundred_rows() -> Table {
        Table::new(vec![
            Column::new(
                "label",
                ColumnType::String,
                (0..100)
                    .map(|i| Value::Text(if i % 3 == 0 { "yes" } else { "no" }.into()))
                    .collect(),
            ),
            Column::new("id", ColumnType::Integer, (0..100).map(Value::Integer).collect()),
        ])
        .unwrap()
    }

    #[test]
    fn test_split_sizes() {
        assert_eq!(split_sizes(100, 0.3), (70, 30));
        assert_eq!(split_sizes(10, 0.25), (7, 3));
        assert_eq!(split_sizes(150, 0.2), (120, 30));
    }

    #[test]
    fn test_split_is_reproducible() {
        let table = hundred_rows();
        let a = train_test_split(&table, "label", 0.3, 42).unwrap();
        let b = train_test_split(&table, "label", 0.3, 42).unwrap();

        assert_eq!(a.train_shape(), (70, 2));
        assert_eq!(a.test_shape(), (30, 2));
        assert_eq!(a.train, b.train);
        assert_eq!(a.test, b.test);
        assert_eq!(
            a.status_message(),
            "Train/Test Split complete (70/30). Train shape: (70, 2), Test shape: (30, 2)"
        );
    }

    #[test]
    fn test_split_layout_and_coverage() {
        let result = train_test_split(&hundred_rows(), "label", 0.3, 7).unwrap();

        assert_eq!(result.train.column_names(), vec!["id", "label"]);
        assert_eq!(result.classes, vec![Value::Text("no".into()), Value::Text("yes".into())]);

        let mut ids: Vec<i64> = result
            .train
            .columns()
            .chain(result.test.columns())
            .filter(|c| c.name() == "id")
            .flat_map(|c| c.values().iter().filter_map(|v| v.as_f64()).map(|v| v as i64))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..100).collect::<Vec<_>>());

        let label = result.test.column("label").unwrap();
        assert_eq!(label.dtype(), ColumnType::Integer);
    }
}
