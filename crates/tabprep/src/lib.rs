//! tabprep: versioned table transformation engine for CSV datasets.
//!
//! An uploaded CSV file becomes a typed, column-oriented [`Table`]. Cleaning
//! and preprocessing operations (missing-value treatment, type conversion,
//! normalization, discretization, one-hot encoding) each produce a new table
//! version; the original upload is kept so a session can always be reset.
//!
//! # Core Principles
//!
//! - **Copy-on-write**: operators never modify the table they are given
//! - **Validate first**: a refused operation leaves the working state untouched
//! - **Derived views follow the table**: summaries are recomputed on every change
//!
//! # Example
//!
//! ```no_run
//! use tabprep::{Operation, Session, TabprepConfig, Upload};
//!
//! let upload = Upload::from_path("titanic.csv").unwrap();
//! let mut session = Session::from_upload(&upload, &TabprepConfig::default()).unwrap();
//!
//! let report = session.apply(&Operation::DropNulls { column: "Age".into() });
//! println!("{}", report.message);
//! println!("Missing values left: {}", session.view().total_missing);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod inference;
pub mod input;
pub mod session;
pub mod store;
pub mod table;
pub mod transform;
pub mod validation;
pub mod view;

pub use config::{ServerConfig, SplitConfig, TabprepConfig};
pub use error::{ErrorKind, OperationError, Result, TabprepError};
pub use export::{Export, ExportKind, SplitResult, train_test_split, write_csv};
pub use input::{Parser, ParserConfig, SourceMetadata, Upload};
pub use session::{OperationReport, Outcome, Session};
pub use store::{TableObserver, TableStore, WorkingState};
pub use table::{Column, ColumnType, Table, Value};
pub use transform::{FillStrategy, Operation, TargetType, TransformEngine, TransformOutcome};
pub use validation::ValidationEngine;
pub use view::{ColumnKind, ColumnSummary, DerivedView, ViewResolver};
