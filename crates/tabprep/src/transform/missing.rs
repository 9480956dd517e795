//! Missing-value treatment: dropping and filling nulls.

use super::operations::{FillStrategy, TransformOutcome};
use crate::error::{ErrorKind, OperationError};
use crate::inference::{Moments, median, mode};
use crate::table::{Column, ColumnType, Table, Value};
use crate::validation::require_column;

/// Remove every row where `column` is null.
pub fn drop_nulls(table: &Table, column: &str) -> Result<TransformOutcome, OperationError> {
    let source = require_column(table, column)?;

    let keep: Vec<usize> = source
        .values()
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_null())
        .map(|(i, _)| i)
        .collect();
    let dropped = source.len() - keep.len();

    let table = if dropped == 0 {
        table.clone()
    } else {
        table.take_rows(&keep)
    };

    Ok(TransformOutcome::new(
        table,
        format!("Dropped {} rows from '{}'.", dropped, column),
        dropped,
    ))
}

/// Replace nulls in `column` with a statistic of its non-null values.
pub fn fill_missing(
    table: &Table,
    column: &str,
    strategy: FillStrategy,
) -> Result<TransformOutcome, OperationError> {
    let source = require_column(table, column)?;
    let nulls = source.null_count();

    let fill = match strategy {
        FillStrategy::Mean | FillStrategy::Median => {
            if !source.dtype().is_numeric() {
                return Err(OperationError::type_mismatch(
                    column,
                    format!(
                        "Column '{}' is {}; {} fill requires a numeric column.",
                        column,
                        source.dtype(),
                        strategy
                    ),
                ));
            }
            let values = source.numeric_values();
            let stat = if strategy == FillStrategy::Mean {
                Moments::from_values(values).mean()
            } else {
                median(values)
            };
            stat.map(Value::float)
        }
        FillStrategy::Mode => {
            let found = mode(source.values()).ok_or_else(|| {
                OperationError::new(
                    ErrorKind::NoModeFound,
                    Some(column),
                    format!("No mode found for '{}'.", column),
                )
            })?;
            Some(found)
        }
    };

    let message = format!("Filled missing values in '{}' with {}.", column, strategy);
    let Some(fill) = fill.filter(|_| nulls > 0) else {
        return Ok(TransformOutcome::new(table.clone(), message, 0));
    };

    let filled = fill_column(source, fill);
    let table = table
        .with_column(filled)
        .map_err(|e| OperationError::type_mismatch(column, e.to_string()))?;

    Ok(TransformOutcome::new(table, message, nulls))
}

/// Build the filled column, promoting integers to float when the fill is fractional.
fn fill_column(source: &Column, fill: Value) -> Column {
    let (dtype, fill) = match (source.dtype(), fill) {
        (ColumnType::Integer, Value::Float(f)) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
            (ColumnType::Integer, Value::Integer(f as i64))
        }
        (ColumnType::Integer, Value::Float(f)) => (ColumnType::Float, Value::Float(f)),
        (dtype, fill) => (dtype, fill),
    };

    let values = source
        .values()
        .iter()
        .map(|v| match v {
            Value::Null => fill.clone(),
            Value::Integer(n) if dtype == ColumnType::Float => Value::Float(*n as f64),
            other => other.clone(),
        })
        .collect();

    Column::new(source.name(), dtype, values)
}
