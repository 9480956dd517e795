//! Table to CSV serialization.

use crate::error::{Result, TabprepError};
use crate::table::Table;

/// Serialize a table to CSV bytes.
///
/// Header row holds the column names in table order. Nulls are written as
/// empty fields and no index column is added.
pub fn write_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.column_names())?;

    for row in 0..table.row_count() {
        let record = table.columns().map(|c| c.values()[row].to_string());
        writer.write_record(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| TabprepError::Csv(e.into_error().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Parser;
    use crate::table::{Column, ColumnType, Value};

    #[test]
    fn test_write_csv() {
        let table = Table::new(vec![
            Column::new(
                "name",
                ColumnType::String,
                vec![Value::Text("a, b".into()), Value::Null],
            ),
            Column::new(
                "score",
                ColumnType::Float,
                vec![Value::Float(2.0), Value::Float(0.125)],
            ),
            Column::new(
                "flag",
                ColumnType::Boolean,
                vec![Value::Boolean(true), Value::Boolean(false)],
            ),
        ])
        .unwrap();

        let text = String::from_utf8(write_csv(&table).unwrap()).unwrap();
        assert_eq!(text, "name,score,flag\n\"a, b\",2.0,True\n,0.125,False\n");
    }

    #[test]
    fn test_round_trip() {
        let source = "id,when,value\n1,2023-01-02 03:04:05,1.5\n2,,\n";
        let parser = Parser::new();
        let table = parser.parse_str(source).unwrap();
        let bytes = write_csv(&table).unwrap();
        let again = parser.parse_str(std::str::from_utf8(&bytes).unwrap()).unwrap();

        assert_eq!(again, table);
        assert_eq!(String::from_utf8(bytes).unwrap(), source);
    }

    #[test]
    fn test_round_trip_fractional_seconds() {
        let source = "when\n2023-01-01 10:00:00.250\n2023-01-01 10:00:01\n";
        let parser = Parser::new();
        let table = parser.parse_str(source).unwrap();
        assert_eq!(table.column("when").unwrap().dtype(), ColumnType::DateTime);

        let bytes = write_csv(&table).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), source);
        let again = parser.parse_str(std::str::from_utf8(&bytes).unwrap()).unwrap();
        assert_eq!(again, table);
    }
}
