//! Uploaded payloads and their metadata.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TabprepError};

/// A file handed over by the upload boundary.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Name the file was uploaded under.
    pub file_name: String,
    /// Raw payload.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Wrap an in-memory payload.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk as if it had been uploaded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| TabprepError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { file_name, bytes })
    }

    /// Returns true if the name ends in `.csv`, ignoring case.
    pub fn has_csv_extension(&self) -> bool {
        self.file_name.to_ascii_lowercase().ends_with(".csv")
    }
}

/// Metadata about an uploaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name as uploaded.
    pub file: String,
    /// SHA-256 hash of the payload.
    pub hash: String,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Detected encoding.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the upload was parsed.
    pub uploaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a parsed upload.
    pub fn new(
        file: impl Into<String>,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            file: file.into(),
            hash,
            size_bytes,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            uploaded_at: Utc::now(),
        }
    }

    /// Status line shown after a successful upload.
    pub fn status_message(&self) -> String {
        format!(
            "Uploaded: {} ({} rows, {} columns)",
            self.file, self.row_count, self.column_count
        )
    }
}
