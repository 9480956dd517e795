//! CSV export and train/test splitting.

mod csv;
mod split;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use self::csv::write_csv;
pub use split::{SplitResult, split_sizes, train_test_split};

use crate::error::Result;
use crate::table::Table;

/// Naming context for a downloadable table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Cleaned,
    Normalized,
    Discretized,
    Encoded,
    Train,
    Test,
}

impl ExportKind {
    /// File name offered for download.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportKind::Cleaned => "cleaned_data.csv",
            ExportKind::Normalized => "normalized_data.csv",
            ExportKind::Discretized => "discretized_data.csv",
            ExportKind::Encoded => "encoded_data.csv",
            ExportKind::Train => "train_data.csv",
            ExportKind::Test => "test_data.csv",
        }
    }

    /// Returns true for the halves of a train/test split.
    pub fn is_split(&self) -> bool {
        matches!(self, ExportKind::Train | ExportKind::Test)
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportKind::Cleaned => "cleaned",
            ExportKind::Normalized => "normalized",
            ExportKind::Discretized => "discretized",
            ExportKind::Encoded => "encoded",
            ExportKind::Train => "train",
            ExportKind::Test => "test",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cleaned" => Ok(ExportKind::Cleaned),
            "normalized" => Ok(ExportKind::Normalized),
            "discretized" => Ok(ExportKind::Discretized),
            "encoded" => Ok(ExportKind::Encoded),
            "train" => Ok(ExportKind::Train),
            "test" => Ok(ExportKind::Test),
            _ => Err(format!(
                "Unknown export: {}. Use cleaned, normalized, discretized, encoded, train or test.",
                s
            )),
        }
    }
}

/// A serialized table ready for download.
#[derive(Debug, Clone)]
pub struct Export {
    pub kind: ExportKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Export {
    /// Serialize a table under the given naming context.
    pub fn new(kind: ExportKind, table: &Table) -> Result<Self> {
        Ok(Self {
            kind,
            file_name: kind.file_name().to_string(),
            bytes: write_csv(table)?,
        })
    }
}
