//! Column-store table.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Result, TabprepError};

use super::column::Column;
use super::value::Value;

/// An ordered set of equal-length, uniquely named columns.
///
/// Columns are reference counted so that a transformed table shares every
/// column it did not touch with its predecessor.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Arc<Column>>,
}

impl Table {
    /// Build a table, checking every invariant.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        Self::from_shared(columns.into_iter().map(Arc::new).collect())
    }

    /// Build a table from shared columns, checking every invariant.
    pub fn from_shared(columns: Vec<Arc<Column>>) -> Result<Self> {
        let table = Self { columns };
        table.revalidate()?;
        Ok(table)
    }

    /// Check names are unique, lengths agree and every cell fits its column type.
    pub fn revalidate(&self) -> Result<()> {
        let mut names = HashSet::new();
        let expected = self.columns.first().map(|c| c.len()).unwrap_or(0);

        for column in &self.columns {
            if !names.insert(column.name()) {
                return Err(TabprepError::Shape(format!(
                    "duplicate column name '{}'",
                    column.name()
                )));
            }
            if column.len() != expected {
                return Err(TabprepError::Shape(format!(
                    "column '{}' has {} values, expected {}",
                    column.name(),
                    column.len(),
                    expected
                )));
            }
            if let Some((row, value)) = column.first_mistyped() {
                return Err(TabprepError::Shape(format!(
                    "row {} of column '{}' holds {:?}, which is not {}",
                    row,
                    column.name(),
                    value,
                    column.dtype()
                )));
            }
        }

        Ok(())
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    /// Iterate over columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().map(|c| c.as_ref())
    }

    /// Shared handles to every column.
    pub fn shared_columns(&self) -> &[Arc<Column>] {
        &self.columns
    }

    /// All column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col).and_then(|c| c.values().get(row))
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<&Value>> {
        if row >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values()[row]).collect())
    }

    /// New table with the same-named column replaced.
    pub fn with_column(&self, column: Column) -> Result<Self> {
        let index = self.column_index(column.name()).ok_or_else(|| {
            TabprepError::Shape(format!("column '{}' not found", column.name()))
        })?;
        let mut columns = self.columns.clone();
        columns[index] = Arc::new(column);
        Self::from_shared(columns)
    }

    /// New table with several columns replaced by name.
    pub fn with_columns(&self, replacements: Vec<Column>) -> Result<Self> {
        let mut columns = self.columns.clone();
        for column in replacements {
            let index = self.column_index(column.name()).ok_or_else(|| {
                TabprepError::Shape(format!("column '{}' not found", column.name()))
            })?;
            columns[index] = Arc::new(column);
        }
        Self::from_shared(columns)
    }

    /// New table holding the given rows, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is not below `row_count()`.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let values = rows.iter().map(|&r| c.values()[r].clone()).collect();
                Arc::new(Column::new(c.name(), c.dtype(), values))
            })
            .collect();
        Self { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnType;

    fn ints(name: &str, values: &[i64]) -> Column {
        Column::new(
            name,
            ColumnType::Integer,
            values.iter().map(|&v| Value::Integer(v)).collect(),
        )
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = Table::new(vec![ints("a", &[1]), ints("a", &[2])]).unwrap_err();
        assert!(err.to_string().contains("duplicate column name"));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let err = Table::new(vec![ints("a", &[1, 2]), ints("b", &[1])]).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_rejects_mistyped_cells() {
        let col = Column::new("a", ColumnType::Integer, vec![Value::Text("x".into())]);
        assert!(Table::new(vec![col]).is_err());
    }

    #[test]
    fn test_with_column_shares_untouched_columns() {
        let table = Table::new(vec![ints("a", &[1, 2]), ints("b", &[3, 4])]).unwrap();
        let next = table.with_column(ints("a", &[5, 6])).unwrap();

        assert!(Arc::ptr_eq(&table.shared_columns()[1], &next.shared_columns()[1]));
        assert_eq!(table.get(0, 0), Some(&Value::Integer(1)));
        assert_eq!(next.get(0, 0), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_take_rows() {
        let table = Table::new(vec![ints("a", &[1, 2, 3])]).unwrap();
        let taken = table.take_rows(&[2, 0]);
        assert_eq!(taken.row_count(), 2);
        assert_eq!(taken.get(0, 0), Some(&Value::Integer(3)));
        assert_eq!(taken.row(1), Some(vec![&Value::Integer(1)]));
    }

    #[test]
    #[should_panic]
    fn test_take_rows_out_of_range_panics() {
        let table = Table::new(vec![ints("a", &[1, 2, 3])]).unwrap();
        table.take_rows(&[3]);
    }
}
