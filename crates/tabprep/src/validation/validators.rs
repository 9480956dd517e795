//! Preconditions checked before an operation touches the table.

use crate::error::{ErrorKind, OperationError};
use crate::export::split_sizes;
use crate::table::{Column, ColumnType, Table};
use crate::transform::{
    DEFAULT_BINS, FillStrategy, Operation, TargetType, check_bins, to_datetime, to_number,
};

/// Look up a column, refusing empty and unknown names.
///
/// Names are matched verbatim, so padded headers stay addressable.
pub fn require_column<'a>(table: &'a Table, name: &str) -> Result<&'a Column, OperationError> {
    if name.is_empty() {
        return Err(OperationError::empty_input());
    }
    table
        .column(name)
        .ok_or_else(|| OperationError::column_not_found(name))
}

/// Trait for operation preconditions.
pub trait Validator: Send + Sync {
    /// Check the operation against the table. Validators that do not apply
    /// to the operation return `Ok(())`.
    fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError>;
}

/// Every named column must be selected and present.
pub struct ColumnValidator;

impl Validator for ColumnValidator {
    fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError> {
        match operation.column() {
            Some(name) => require_column(table, name).map(|_| ()),
            None => Ok(()),
        }
    }
}

/// Mean and median need a numeric column; mode needs at least one value.
pub struct FillValidator;

impl Validator for FillValidator {
    fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError> {
        let Operation::FillMissing { column, strategy } = operation else {
            return Ok(());
        };
        let source = require_column(table, column)?;

        match strategy {
            FillStrategy::Mean | FillStrategy::Median if !source.dtype().is_numeric() => {
                Err(OperationError::type_mismatch(
                    column,
                    format!(
                        "Column '{}' is {}; {} fill requires a numeric column.",
                        column,
                        source.dtype(),
                        strategy
                    ),
                ))
            }
            FillStrategy::Mode if source.non_null().next().is_none() => Err(OperationError::new(
                ErrorKind::NoModeFound,
                Some(column),
                format!("No mode found for '{}'.", column),
            )),
            _ => Ok(()),
        }
    }
}

/// Numeric targets need every non-null cell to be numeric; datetime needs at
/// least one parseable cell.
pub struct ConversionValidator;

impl Validator for ConversionValidator {
    fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError> {
        let Operation::ConvertType { column, target } = operation else {
            return Ok(());
        };
        let source = require_column(table, column)?;

        match target {
            TargetType::Integer | TargetType::Float => {
                let integer = *target == TargetType::Integer;
                let bad = source.non_null().any(|v| match to_number(v) {
                    Some(x) => integer && !x.is_finite(),
                    None => true,
                });
                if bad {
                    return Err(OperationError::type_mismatch(
                        column,
                        format!(
                            "Error: Column '{}' contains non-numeric values and cannot be converted to {}.",
                            column,
                            if integer { "integer" } else { "float" }
                        ),
                    ));
                }
            }
            TargetType::DateTime => {
                let mut values = source.non_null().peekable();
                if values.peek().is_some() && values.all(|v| to_datetime(v).is_none()) {
                    return Err(OperationError::type_mismatch(
                        column,
                        format!(
                            "Error: Column '{}' cannot be converted into datetime format.",
                            column
                        ),
                    ));
                }
            }
            TargetType::String | TargetType::Categorical => {}
        }
        Ok(())
    }
}

/// Normalization needs at least one numeric column.
pub struct NormalizeValidator;

impl Validator for NormalizeValidator {
    fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError> {
        if !matches!(operation, Operation::Normalize) {
            return Ok(());
        }
        if table.columns().any(|c| c.dtype().is_numeric()) {
            Ok(())
        } else {
            Err(OperationError::new(
                ErrorKind::NoNumericColumns,
                None,
                "No numeric columns to normalize.",
            ))
        }
    }
}

/// Discretization needs a numeric column with finite values and a bin count
/// in `1..=MAX_BINS`.
pub struct DiscretizeValidator;

impl Validator for DiscretizeValidator {
    fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError> {
        let Operation::Discretize { column, bins } = operation else {
            return Ok(());
        };
        let source = require_column(table, column)?;

        if !source.dtype().is_numeric() {
            return Err(OperationError::type_mismatch(
                column,
                format!(
                    "Column '{}' is {}; discretization requires a numeric column.",
                    column,
                    source.dtype()
                ),
            ));
        }
        // before anything is sized by the bin count
        check_bins(column, bins.unwrap_or(DEFAULT_BINS))?;

        let values = source.numeric_values();
        if values.is_empty() {
            return Err(OperationError::invalid_parameter(
                Some(column),
                format!("Column '{}' has no values to discretize.", column),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(OperationError::invalid_parameter(
                Some(column),
                format!(
                    "Column '{}' contains infinite values and cannot be discretized.",
                    column
                ),
            ));
        }
        Ok(())
    }
}

/// Runs every validator in order, stopping at the first refusal.
pub struct ValidationEngine {
    validators: Vec<Box<dyn Validator>>,
}

impl ValidationEngine {
    /// Create a new validation engine with all default validators.
    pub fn new() -> Self {
        Self {
            validators: vec![
                Box::new(ColumnValidator),
                Box::new(FillValidator),
                Box::new(ConversionValidator),
                Box::new(NormalizeValidator),
                Box::new(DiscretizeValidator),
            ],
        }
    }

    /// Check an operation before it is applied.
    pub fn check(&self, table: &Table, operation: &Operation) -> Result<(), OperationError> {
        self.validators
            .iter()
            .try_for_each(|validator| validator.check(table, operation))
    }

    /// Check a train/test split request.
    pub fn check_split(
        &self,
        table: &Table,
        target: &str,
        test_fraction: f64,
    ) -> Result<(), OperationError> {
        if target.is_empty() {
            return Err(OperationError::empty_input());
        }
        let Some(column) = table.column(target) else {
            return Err(OperationError::new(
                ErrorKind::ColumnNotFound,
                Some(target),
                format!("Target variable '{}' not found in data.", target),
            ));
        };

        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(OperationError::invalid_parameter(
                Some(target),
                format!("Test size must be between 0 and 1, got {}.", test_fraction),
            ));
        }
        if column.null_count() > 0 {
            return Err(OperationError::invalid_parameter(
                Some(target),
                format!("Target variable '{}' contains missing values.", target),
            ));
        }
        if column.dtype() == ColumnType::Float
            && column.numeric_values().iter().any(|v| !v.is_finite())
        {
            return Err(OperationError::invalid_parameter(
                Some(target),
                format!("Target variable '{}' contains infinite values.", target),
            ));
        }

        let rows = table.row_count();
        let (train, test) = split_sizes(rows, test_fraction);
        if train == 0 || test == 0 {
            return Err(OperationError::invalid_parameter(
                Some(target),
                format!(
                    "Cannot split {} rows with test size {}: both parts need at least one row.",
                    rows, test_fraction
                ),
            ));
        }
        Ok(())
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Value;
    use crate::transform::MAX_BINS;

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "n",
                ColumnType::Integer,
                vec![Value::Integer(1), Value::Null, Value::Integer(3)],
            ),
            Column::new(
                "s",
                ColumnType::String,
                vec![
                    Value::Text("a".into()),
                    Value::Text("2020-01-01".into()),
                    Value::Null,
                ],
            ),
            Column::new("empty", ColumnType::Float, vec![Value::Null; 3]),
        ])
        .unwrap()
    }

    fn kind(op: Operation) -> Option<ErrorKind> {
        ValidationEngine::new().check(&sample(), &op).err().map(|e| e.kind)
    }

    #[test]
    fn test_column_presence() {
        assert_eq!(
            kind(Operation::DropNulls { column: "".into() }),
            Some(ErrorKind::EmptyInput)
        );
        assert_eq!(
            kind(Operation::DropNulls { column: "zzz".into() }),
            Some(ErrorKind::ColumnNotFound)
        );
        assert_eq!(kind(Operation::DropNulls { column: "n".into() }), None);
    }

    #[test]
    fn test_padded_column_names_are_reachable() {
        let table = Table::new(vec![Column::new(
            " x",
            ColumnType::Integer,
            vec![Value::Integer(1), Value::Null],
        )])
        .unwrap();
        let engine = ValidationEngine::new();
        let drop = |column: &str| Operation::DropNulls {
            column: column.into(),
        };

        assert!(engine.check(&table, &drop(" x")).is_ok());
        assert_eq!(
            engine.check(&table, &drop("x")).unwrap_err().kind,
            ErrorKind::ColumnNotFound
        );
        assert_eq!(
            engine.check(&table, &drop(" ")).unwrap_err().kind,
            ErrorKind::ColumnNotFound
        );
    }

    #[test]
    fn test_fill_preconditions() {
        let fill = |column: &str, strategy| Operation::FillMissing {
            column: column.into(),
            strategy,
        };
        assert_eq!(kind(fill("s", FillStrategy::Mean)), Some(ErrorKind::TypeMismatch));
        assert_eq!(kind(fill("s", FillStrategy::Mode)), None);
        assert_eq!(kind(fill("empty", FillStrategy::Mode)), Some(ErrorKind::NoModeFound));
        assert_eq!(kind(fill("n", FillStrategy::Median)), None);
    }

    #[test]
    fn test_conversion_preconditions() {
        let convert = |target| Operation::ConvertType {
            column: "s".into(),
            target,
        };
        assert_eq!(kind(convert(TargetType::Integer)), Some(ErrorKind::TypeMismatch));
        // one parseable date is enough
        assert_eq!(kind(convert(TargetType::DateTime)), None);
        assert_eq!(kind(convert(TargetType::Categorical)), None);
    }

    #[test]
    fn test_discretize_preconditions() {
        let discretize = |column: &str, bins| Operation::Discretize {
            column: column.into(),
            bins: Some(bins),
        };
        assert_eq!(kind(discretize("n", 0)), Some(ErrorKind::InvalidParameter));
        assert_eq!(kind(discretize("n", MAX_BINS + 1)), Some(ErrorKind::InvalidParameter));
        assert_eq!(kind(discretize("n", usize::MAX)), Some(ErrorKind::InvalidParameter));
        assert_eq!(kind(discretize("n", MAX_BINS)), None);
        assert_eq!(kind(discretize("s", 3)), Some(ErrorKind::TypeMismatch));
        assert_eq!(kind(discretize("empty", 3)), Some(ErrorKind::InvalidParameter));
        assert_eq!(kind(discretize("n", 3)), None);
    }

    #[test]
    fn test_normalize_needs_numeric_column() {
        let table = Table::new(vec![Column::new(
            "s",
            ColumnType::String,
            vec![Value::Text("a".into())],
        )])
        .unwrap();
        let err = ValidationEngine::new()
            .check(&table, &Operation::Normalize)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NoNumericColumns);
    }

    #[test]
    fn test_split_preconditions() {
        let engine = ValidationEngine::new();
        let table = sample();

        let err = engine.check_split(&table, "target", 0.3).unwrap_err();
        assert_eq!(err.message, "Target variable 'target' not found in data.");
        assert_eq!(
            engine.check_split(&table, "s", 1.5).unwrap_err().kind,
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            engine.check_split(&table, "n", 0.3).unwrap_err().kind,
            ErrorKind::InvalidParameter
        );
        assert_eq!(
            engine.check_split(&table, "", 0.3).unwrap_err().kind,
            ErrorKind::EmptyInput
        );
    }
}
