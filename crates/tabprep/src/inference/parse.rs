//! Cell parsing and column type inference.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::{Column, ColumnType, Value};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Date patterns compiled once on first use. A column is only inferred as
// datetime at upload when every value matches one of these.

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap(), // ISO date
        Regex::new(r"^\d{4}/\d{2}/\d{2}").unwrap(), // Alt ISO
    ]
});

/// Datetime layouts accepted by conversion, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts accepted by conversion, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%b %d, %Y", "%d %b %Y"];

/// Check if a raw cell is one of the configured null markers.
pub fn is_null_marker(raw: &str, markers: &[String]) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || markers.iter().any(|m| m == trimmed)
}

pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|f| !f.is_nan())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Parse a datetime from any supported layout.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn looks_like_date(raw: &str) -> bool {
    let trimmed = raw.trim();
    DATE_PATTERNS.iter().any(|p| p.is_match(trimmed)) && parse_datetime(trimmed).is_some()
}

/// Infer the type of a column from its non-null raw cells.
///
/// Columns with no values at all are typed as float, matching how an empty
/// numeric column reads back.
pub fn infer_type(cells: &[Option<&str>]) -> ColumnType {
    let present: Vec<&str> = cells.iter().flatten().copied().collect();
    if present.is_empty() {
        return ColumnType::Float;
    }

    if present.iter().all(|s| parse_integer(s).is_some()) {
        ColumnType::Integer
    } else if present.iter().all(|s| parse_float(s).is_some()) {
        ColumnType::Float
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        ColumnType::Boolean
    } else if present.iter().all(|s| looks_like_date(s)) {
        ColumnType::DateTime
    } else {
        ColumnType::String
    }
}

/// Parse one raw cell as the given type. Unparseable cells become null.
pub fn parse_cell(raw: &str, dtype: ColumnType) -> Value {
    let parsed = match dtype {
        ColumnType::Integer => parse_integer(raw).map(Value::Integer),
        ColumnType::Float => parse_float(raw).map(Value::Float),
        ColumnType::Boolean => parse_bool(raw).map(Value::Boolean),
        ColumnType::DateTime => parse_datetime(raw).map(Value::DateTime),
        ColumnType::String | ColumnType::Categorical => Some(Value::Text(raw.to_string())),
    };
    parsed.unwrap_or(Value::Null)
}

/// Build a typed column from raw cells (`None` marks a null).
pub fn build_column(name: impl Into<String>, cells: &[Option<&str>]) -> Column {
    let dtype = infer_type(cells);
    let values = cells
        .iter()
        .map(|cell| match cell {
            Some(raw) => parse_cell(raw, dtype),
            None => Value::Null,
        })
        .collect();
    Column::new(name, dtype, values)
}
