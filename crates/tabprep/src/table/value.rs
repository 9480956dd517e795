//! Typed cell values.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::types::ColumnType;

/// Format used when writing datetime cells. Fractional seconds are only
/// written when present.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// A single nullable cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl Value {
    /// Wrap a float, mapping NaN to null.
    pub fn float(value: f64) -> Self {
        if value.is_nan() {
            Value::Null
        } else {
            Value::Float(value)
        }
    }

    /// Returns true if the cell is missing.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns true if the cell may live in a column of the given type.
    pub fn fits(&self, dtype: ColumnType) -> bool {
        match (self, dtype) {
            (Value::Null, _) => true,
            (Value::Integer(_), ColumnType::Integer) => true,
            (Value::Float(_), ColumnType::Float) => true,
            (Value::Boolean(_), ColumnType::Boolean) => true,
            (Value::DateTime(_), ColumnType::DateTime) => true,
            (Value::Text(_), ColumnType::String | ColumnType::Categorical) => true,
            _ => false,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) | Value::Float(_) => 2,
            Value::DateTime(_) => 3,
            Value::Text(_) => 4,
        }
    }

    /// Total order used for sorted distinct values and mode tie-breaks.
    ///
    /// Nulls sort first, then booleans, numbers, datetimes and text.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }
}

/// Render a float so that integral values keep a decimal point.
fn format_float(value: f64) -> String {
    // integral floats keep a ".0" so they read back as floats
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(true) => f.write_str("True"),
            Value::Boolean(false) => f.write_str("False"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Value::Text(s) => f.write_str(s),
        }
    }
}
