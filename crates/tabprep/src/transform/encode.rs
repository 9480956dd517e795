//! One-hot and label encoding.

use std::collections::HashMap;
use std::sync::Arc;

use super::operations::TransformOutcome;
use crate::error::OperationError;
use crate::table::{Column, ColumnType, Table, Value};
use crate::validation::require_column;

/// One-hot expand every categorical column except `target`.
///
/// Retained columns keep their order; indicator columns named
/// `<column>_<value>` follow them, one per distinct value in ascending order.
pub fn one_hot_encode(table: &Table, target: &str) -> Result<TransformOutcome, OperationError> {
    require_column(table, target)?;

    let (expanded, retained): (Vec<&Arc<Column>>, Vec<&Arc<Column>>) = table
        .shared_columns()
        .iter()
        .partition(|c| c.dtype().is_categorical() && c.name() != target);

    let mut columns: Vec<Arc<Column>> = retained.into_iter().cloned().collect();
    let mut indicators = 0;
    for column in &expanded {
        for column in indicator_columns(column) {
            indicators += 1;
            columns.push(Arc::new(column));
        }
    }

    let table = Table::from_shared(columns)
        .map_err(|e| OperationError::invalid_parameter(Some(target), e.to_string()))?;

    Ok(TransformOutcome::new(
        table,
        format!("One-hot encoding applied to {} columns.", expanded.len()),
        indicators,
    ))
}

/// One boolean column per distinct value of `column`. Nulls are false everywhere.
fn indicator_columns(column: &Column) -> Vec<Column> {
    column
        .sorted_distinct()
        .into_iter()
        .map(|value| {
            let key = value.to_string();
            let flags = column
                .values()
                .iter()
                .map(|v| Value::Boolean(!v.is_null() && v.to_string() == key))
                .collect();
            Column::new(format!("{}_{}", column.name(), key), ColumnType::Boolean, flags)
        })
        .collect()
}

/// Replace values with contiguous integer codes assigned by sorted distinct value.
///
/// Returns the coded column and the classes in code order. Nulls stay null.
pub fn label_encode(column: &Column) -> (Column, Vec<Value>) {
    let classes = column.sorted_distinct();
    let codes: HashMap<String, i64> = classes
        .iter()
        .enumerate()
        .map(|(code, value)| (value.to_string(), code as i64))
        .collect();

    let values = column
        .values()
        .iter()
        .map(|v| match codes.get(&v.to_string()) {
            Some(code) if !v.is_null() => Value::Integer(*code),
            _ => Value::Null,
        })
        .collect();

    (Column::new(column.name(), ColumnType::Integer, values), classes)
}
