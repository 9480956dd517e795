//! Column type conversion.

use chrono::NaiveDateTime;

use super::operations::{TargetType, TransformOutcome};
use crate::error::OperationError;
use crate::inference::{parse_datetime, parse_float};
use crate::table::{Column, ColumnType, Table, Value};
use crate::validation::require_column;

/// Numeric reading of a cell, as used by integer and float conversion.
pub(crate) fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(n) => Some(*n as f64),
        Value::Float(f) => Some(*f),
        Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_float(s),
        Value::Null | Value::DateTime(_) => None,
    }
}

/// Datetime reading of a cell. Anything unparseable reads as `None`.
pub(crate) fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Text(s) => parse_datetime(s),
        _ => None,
    }
}

/// Round half to even and narrow to an integer.
fn to_integer(value: f64) -> Option<i64> {
    let rounded = value.round_ties_even();
    (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64)
        .then_some(rounded as i64)
}

/// Coerce a column to the target type.
///
/// Integer and float targets refuse the whole column if any non-null cell is
/// not numeric. Datetime targets null out unparseable cells and only refuse
/// when every non-null cell fails.
pub fn convert_type(
    table: &Table,
    column: &str,
    target: TargetType,
) -> Result<TransformOutcome, OperationError> {
    let source = require_column(table, column)?;

    let (dtype, values): (ColumnType, Vec<Value>) = match target {
        TargetType::Integer => {
            let values = source
                .values()
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(Value::Null),
                    other => to_number(other).and_then(to_integer).map(Value::Integer).ok_or_else(|| {
                        OperationError::type_mismatch(
                            column,
                            format!(
                                "Error: Column '{}' contains non-numeric values and cannot be converted to integer.",
                                column
                            ),
                        )
                    }),
                })
                .collect::<Result<_, _>>()?;
            (ColumnType::Integer, values)
        }
        TargetType::Float => {
            let values = source
                .values()
                .iter()
                .map(|v| match v {
                    Value::Null => Ok(Value::Null),
                    other => to_number(other).map(Value::float).ok_or_else(|| {
                        OperationError::type_mismatch(
                            column,
                            format!(
                                "Error: Column '{}' contains non-numeric values and cannot be converted to float.",
                                column
                            ),
                        )
                    }),
                })
                .collect::<Result<_, _>>()?;
            (ColumnType::Float, values)
        }
        TargetType::String | TargetType::Categorical => {
            let values = source
                .values()
                .iter()
                .map(|v| match v {
                    Value::Null => Value::Null,
                    Value::Text(s) => Value::Text(s.clone()),
                    other => Value::Text(other.to_string()),
                })
                .collect();
            let dtype = if target == TargetType::String {
                ColumnType::String
            } else {
                ColumnType::Categorical
            };
            (dtype, values)
        }
        TargetType::DateTime => {
            let values: Vec<Value> = source
                .values()
                .iter()
                .map(|v| to_datetime(v).map(Value::DateTime).unwrap_or(Value::Null))
                .collect();
            let converted = values.iter().filter(|v| !v.is_null()).count();
            if converted == 0 && source.null_count() < source.len() {
                return Err(OperationError::type_mismatch(
                    column,
                    format!(
                        "Error: Column '{}' cannot be converted into datetime format.",
                        column
                    ),
                ));
            }
            (ColumnType::DateTime, values)
        }
    };

    let changed = source
        .values()
        .iter()
        .zip(&values)
        .filter(|(before, after)| before != after)
        .count();

    let table = table
        .with_column(Column::new(column, dtype, values))
        .map_err(|e| OperationError::type_mismatch(column, e.to_string()))?;

    Ok(TransformOutcome::new(
        table,
        format!("✓ Column '{}' converted to {}.", column, target),
        changed,
    ))
}
