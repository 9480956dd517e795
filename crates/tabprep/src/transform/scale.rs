//! Z-score normalization and equal-width discretization.

use super::operations::TransformOutcome;
use crate::error::{ErrorKind, OperationError};
use crate::inference::Moments;
use crate::table::{Column, ColumnType, Table, Value};
use crate::validation::require_column;

/// Relative widening applied to the outer edges, so the minimum lands in the first bin.
const EDGE_ADJUSTMENT: f64 = 0.001;

/// Bin count used when a discretization does not name one.
pub const DEFAULT_BINS: usize = 4;

/// Largest bin count accepted by discretization.
pub const MAX_BINS: usize = 1_000;

/// Refuse bin counts outside `1..=MAX_BINS`.
pub(crate) fn check_bins(column: &str, bins: usize) -> Result<(), OperationError> {
    if (1..=MAX_BINS).contains(&bins) {
        Ok(())
    } else {
        Err(OperationError::invalid_parameter(
            Some(column),
            format!("Number of bins must be between 1 and {}, got {}.", MAX_BINS, bins),
        ))
    }
}

/// Replace every numeric column with its z-scores.
///
/// Uses the sample standard deviation. Columns with zero or undefined
/// variance become all-null.
pub fn normalize(table: &Table) -> Result<TransformOutcome, OperationError> {
    let mut replaced = Vec::new();
    let mut changed = 0;

    for column in table.columns().filter(|c| c.dtype().is_numeric()) {
        let moments = Moments::from_values(column.numeric_values());
        let scale = match (moments.mean(), moments.sample_std()) {
            (Some(mean), Some(std)) if std > 0.0 && std.is_finite() => Some((mean, std)),
            _ => None,
        };

        let values: Vec<Value> = column
            .values()
            .iter()
            .map(|v| match (v.as_f64(), scale) {
                (Some(x), Some((mean, std))) => Value::float((x - mean) / std),
                _ => Value::Null,
            })
            .collect();
        changed += column.len() - column.null_count();
        replaced.push(Column::new(column.name(), ColumnType::Float, values));
    }

    if replaced.is_empty() {
        return Err(OperationError::new(
            ErrorKind::NoNumericColumns,
            None,
            "No numeric columns to normalize.",
        ));
    }

    let table = table
        .with_columns(replaced)
        .map_err(|e| OperationError::invalid_parameter(None, e.to_string()))?;

    Ok(TransformOutcome::new(table, "Z-Score normalization applied.", changed))
}

/// Bin edges for `bins` equal-width intervals over `[min, max]`.
///
/// The lower edge is pulled down slightly so every interval can be
/// right-closed. A constant column is widened around its value. Duplicate
/// edges are collapsed. `bins` is clamped to `1..=MAX_BINS`.
pub fn equal_width_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let bins = bins.clamp(1, MAX_BINS);
    let (lo, hi) = if min == max {
        let adjust = if min == 0.0 {
            EDGE_ADJUSTMENT
        } else {
            EDGE_ADJUSTMENT * min.abs()
        };
        (min - adjust, max + adjust)
    } else {
        (min, max)
    };

    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();
    edges[bins] = hi;
    if min != max {
        edges[0] -= EDGE_ADJUSTMENT * (max - min);
    }

    edges.dedup();
    edges
}

/// Index of the right-closed interval `value` falls in.
fn bin_label(edges: &[f64], value: f64) -> usize {
    let last = edges.len().saturating_sub(2);
    edges[1..].partition_point(|e| *e < value).min(last)
}

/// Partition a numeric column into equal-width bins labelled `0..bins-1`.
pub fn discretize(
    table: &Table,
    column: &str,
    bins: usize,
) -> Result<TransformOutcome, OperationError> {
    let source = require_column(table, column)?;

    if !source.dtype().is_numeric() {
        return Err(OperationError::type_mismatch(
            column,
            format!("Column '{}' is {}; discretization requires a numeric column.", column, source.dtype()),
        ));
    }
    check_bins(column, bins)?;

    let values = source.numeric_values();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(OperationError::invalid_parameter(
            Some(column),
            format!("Column '{}' contains infinite values and cannot be discretized.", column),
        ));
    }
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return Err(OperationError::invalid_parameter(
            Some(column),
            format!("Column '{}' has no values to discretize.", column),
        ));
    };

    let edges = equal_width_edges(min, max, bins);
    let labels: Vec<Value> = source
        .values()
        .iter()
        .map(|v| match v.as_f64() {
            Some(x) => Value::Text(bin_label(&edges, x).to_string()),
            None => Value::Null,
        })
        .collect();

    let table = table
        .with_column(Column::new(column, ColumnType::Categorical, labels))
        .map_err(|e| OperationError::invalid_parameter(Some(column), e.to_string()))?;

    Ok(TransformOutcome::new(
        table,
        format!("Column '{}' discretized into {} equal-width bins.", column, edges.len() - 1),
        values.len(),
    ))
}
