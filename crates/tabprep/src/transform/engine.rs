//! Transformation engine that validates and applies operations.

use tracing::debug;

use crate::error::OperationError;
use crate::table::Table;
use crate::validation::ValidationEngine;

use super::convert::convert_type;
use super::encode::one_hot_encode;
use super::missing::{drop_nulls, fill_missing};
use super::operations::{Operation, TransformOutcome};
use super::scale::{DEFAULT_BINS, discretize, normalize};

/// Engine for applying operations to a table.
///
/// Every operation is checked by the validation engine first, so a refused
/// operation never reaches an operator.
#[derive(Default)]
pub struct TransformEngine {
    validation: ValidationEngine,
}

impl TransformEngine {
    /// Create a new transform engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validation engine used before each operation.
    pub fn validation(&self) -> &ValidationEngine {
        &self.validation
    }

    /// Validate and apply one operation, producing a new table.
    ///
    /// The input table is never modified.
    pub fn apply(
        &self,
        table: &Table,
        operation: &Operation,
    ) -> Result<TransformOutcome, OperationError> {
        self.validation.check(table, operation)?;

        let outcome = match operation {
            Operation::DropNulls { column } => drop_nulls(table, column),
            Operation::FillMissing { column, strategy } => fill_missing(table, column, *strategy),
            Operation::Normalize => normalize(table),
            Operation::Discretize { column, bins } => {
                discretize(table, column, bins.unwrap_or(DEFAULT_BINS))
            }
            Operation::Encode { target } => one_hot_encode(table, target),
            Operation::ConvertType { column, target } => convert_type(table, column, *target),
        }?;

        debug!(
            operation = operation.name(),
            changed = outcome.values_changed,
            rows = outcome.table.row_count(),
            columns = outcome.table.column_count(),
            "operation applied"
        );
        Ok(outcome)
    }

    /// Apply a sequence of operations, stopping at the first refusal.
    pub fn apply_all(
        &self,
        table: &Table,
        operations: &[Operation],
    ) -> Result<Vec<TransformOutcome>, OperationError> {
        let mut outcomes: Vec<TransformOutcome> = Vec::with_capacity(operations.len());
        for operation in operations {
            let current = outcomes.last().map(|o| &o.table).unwrap_or(table);
            let outcome = self.apply(current, operation)?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }
}
