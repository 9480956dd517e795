//! CSV upload parser.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{SourceMetadata, Upload};
use crate::error::{Result, TabprepError};
use crate::inference::{build_column, is_null_marker};
use crate::table::Table;

/// Message shown when a non-CSV file is uploaded.
pub const NOT_CSV_MESSAGE: &str = "Please upload a CSV file.";

/// Null markers recognised by default (exact match after trimming).
const DEFAULT_NULL_VALUES: &[&str] = &[
    "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: char,
    /// Quote character.
    pub quote: char,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Cell texts read as null. Empty cells are always null.
    pub null_values: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            max_rows: None,
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(TabprepError::Config(format!("{} must be an ASCII character, got '{}'", what, c)))
    }
}

/// Parses uploaded CSV payloads into typed tables.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Validate, decode and parse an upload.
    pub fn parse_upload(&self, upload: &Upload) -> Result<(Table, SourceMetadata)> {
        if !upload.has_csv_extension() {
            return Err(TabprepError::UnsupportedFormat(NOT_CSV_MESSAGE.to_string()));
        }

        let text = std::str::from_utf8(&upload.bytes).map_err(|e| {
            TabprepError::Encoding(format!("'{}' is not valid UTF-8: {}", upload.file_name, e))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&upload.bytes);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_str(text)?;
        debug!(
            file = %upload.file_name,
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed upload"
        );

        let metadata = SourceMetadata::new(
            upload.file_name.clone(),
            hash,
            upload.bytes.len() as u64,
            table.row_count(),
            table.column_count(),
        );
        Ok((table, metadata))
    }

    /// Parse CSV text with a header row.
    pub fn parse_str(&self, text: &str) -> Result<Table> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(ascii_byte(self.config.delimiter, "delimiter")?)
            .quote(ascii_byte(self.config.quote, "quote")?)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(TabprepError::EmptyData("No columns found".to_string()));
        }
        if let Some(position) = headers.iter().position(|h| h.trim().is_empty()) {
            return Err(TabprepError::Shape(format!(
                "column {} has a blank header",
                position + 1
            )));
        }
        let expected_cols = headers.len();

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();

            // Pad short rows, truncate long ones
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(TabprepError::EmptyData("No data rows found".to_string()));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(col_idx, name)| {
                let cells: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| {
                        let raw = row[col_idx].as_str();
                        (!is_null_marker(raw, &self.config.null_values)).then_some(raw)
                    })
                    .collect();
                build_column(name.as_str(), &cells)
            })
            .collect();

        Table::new(columns)
    }
}
