//! Configuration for sessions, splitting and the HTTP server.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TabprepError};
use crate::input::ParserConfig;
use crate::transform::{DEFAULT_BINS, MAX_BINS};

/// Train/test split defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Seed for the row shuffle; the same seed always yields the same split.
    pub seed: u64,
    /// Share of rows placed in the test part.
    pub test_fraction: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_fraction: 0.3,
        }
    }
}

/// Address the HTTP API binds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted upload body.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3141,
            max_upload_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Top-level configuration. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabprepConfig {
    /// Upload parsing options.
    pub parser: ParserConfig,
    /// Split defaults.
    pub split: SplitConfig,
    /// Bin count offered when discretizing.
    pub discretize_bins: usize,
    /// Rows shown in a preview.
    pub preview_rows: usize,
    /// HTTP server address.
    pub server: ServerConfig,
}

impl Default for TabprepConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            split: SplitConfig::default(),
            discretize_bins: DEFAULT_BINS,
            preview_rows: 10,
            server: ServerConfig::default(),
        }
    }
}

impl TabprepConfig {
    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| TabprepError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let fraction = self.split.test_fraction;
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(TabprepError::Config(format!(
                "split.test_fraction must be between 0 and 1, got {}",
                fraction
            )));
        }
        if !(1..=MAX_BINS).contains(&self.discretize_bins) {
            return Err(TabprepError::Config(format!(
                "discretize_bins must be between 1 and {}, got {}",
                MAX_BINS, self.discretize_bins
            )));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(TabprepError::Config(
                "server.max_upload_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
