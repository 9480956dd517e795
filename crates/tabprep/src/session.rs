//! One uploaded dataset and everything derived from it.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TabprepConfig;
use crate::error::{OperationError, Result, TabprepError};
use crate::export::{Export, ExportKind, SplitResult, train_test_split};
use crate::input::{Parser, SourceMetadata, Upload};
use crate::store::{RESET_MESSAGE, TableStore, WorkingState};
use crate::table::Table;
use crate::transform::{Operation, TransformEngine};
use crate::view::{
    ColumnKind, CrossCount, DerivedView, Preview, ViewResolver, crosstab, preview, value_counts,
};

/// What happened to the working state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// A new table version was stored.
    Applied,
    /// Nothing to do; the state is untouched and no error is shown.
    Unchanged,
    /// The operation was refused; the state is untouched.
    Rejected,
}

/// Result of one user action, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub outcome: Outcome,
    /// Status line. Empty for silent no-ops.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    /// Rows removed or cells rewritten.
    pub values_changed: usize,
    /// Working-state version after the action.
    pub version: u64,
    pub modified: bool,
}

impl OperationReport {
    fn new(outcome: Outcome, message: impl Into<String>, state: &WorkingState) -> Self {
        Self {
            outcome,
            message: message.into(),
            error: None,
            values_changed: 0,
            version: state.version,
            modified: state.modified,
        }
    }

    fn refused(error: OperationError, state: &WorkingState) -> Self {
        let outcome = if error.kind.is_silent() || error.kind.is_informational() {
            Outcome::Unchanged
        } else {
            Outcome::Rejected
        };
        let mut report = Self::new(outcome, error.message.clone(), state);
        if outcome == Outcome::Rejected {
            report.error = Some(error);
        }
        report
    }

    /// Returns true if a new table version was stored.
    pub fn is_applied(&self) -> bool {
        self.outcome == Outcome::Applied
    }
}

fn generate_session_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("ses_{:03}_{:08x}", n, fastrand::u32(..))
}

/// An interactive session over one uploaded dataset.
///
/// Owns the table store, the derived view that follows it, and the most
/// recent train/test split.
pub struct Session {
    id: String,
    source: SourceMetadata,
    config: TabprepConfig,
    store: TableStore,
    views: Arc<ViewResolver>,
    engine: TransformEngine,
    last_kind: ExportKind,
    last_split: Option<SplitResult>,
}

impl Session {
    /// Parse an upload and start a session on it.
    pub fn from_upload(upload: &Upload, config: &TabprepConfig) -> Result<Self> {
        let parser = Parser::with_config(config.parser.clone());
        let (table, source) = parser.parse_upload(upload)?;
        Ok(Self::new(table, source, config.clone()))
    }

    /// Start a session on an already parsed table.
    pub fn new(table: Table, source: SourceMetadata, config: TabprepConfig) -> Self {
        let mut store = TableStore::new(table);
        let views = Arc::new(ViewResolver::new());
        store.subscribe(views.clone());

        let session = Self {
            id: generate_session_id(),
            source,
            config,
            store,
            views,
            engine: TransformEngine::new(),
            last_kind: ExportKind::Cleaned,
            last_split: None,
        };
        info!(
            session = %session.id,
            file = %session.source.file,
            rows = session.source.row_count,
            columns = session.source.column_count,
            "session started"
        );
        session
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    pub fn config(&self) -> &TabprepConfig {
        &self.config
    }

    /// Current working state.
    pub fn state(&self) -> &WorkingState {
        self.store.get()
    }

    /// Current table.
    pub fn table(&self) -> &Arc<Table> {
        self.store.table()
    }

    /// Derived view of the current table.
    pub fn view(&self) -> Arc<DerivedView> {
        self.views.current()
    }

    /// Modified indicator line, if the table differs from the upload.
    pub fn status_message(&self) -> Option<&'static str> {
        self.state().status_message()
    }

    /// Validate and apply one operation to the working table.
    ///
    /// Refusals leave the working state untouched.
    pub fn apply(&mut self, operation: &Operation) -> OperationReport {
        let operation = self.with_defaults(operation);
        let operation = operation.as_ref();
        match self.engine.apply(self.store.table(), operation) {
            Ok(outcome) => {
                let state = self.store.set(outcome.table);
                info!(
                    session = %self.id,
                    operation = operation.name(),
                    column = operation.column().unwrap_or_default(),
                    rows = state.table.row_count(),
                    changed = outcome.values_changed,
                    version = state.version,
                    "operation applied"
                );
                let mut report = OperationReport::new(Outcome::Applied, outcome.message, state);
                report.values_changed = outcome.values_changed;
                self.last_kind = operation.export_kind();
                report
            }
            Err(error) => {
                if error.kind.is_silent() {
                    debug!(session = %self.id, operation = operation.name(), "nothing selected");
                } else {
                    warn!(
                        session = %self.id,
                        operation = operation.name(),
                        kind = ?error.kind,
                        column = error.column.as_deref().unwrap_or_default(),
                        "operation refused: {}",
                        error.message
                    );
                }
                OperationReport::refused(error, self.store.get())
            }
        }
    }

    /// Fill parameters the request left to configuration.
    fn with_defaults<'a>(&self, operation: &'a Operation) -> Cow<'a, Operation> {
        match operation {
            Operation::Discretize { column, bins: None } => Cow::Owned(Operation::Discretize {
                column: column.clone(),
                bins: Some(self.config.discretize_bins),
            }),
            _ => Cow::Borrowed(operation),
        }
    }

    /// Restore the uploaded table.
    pub fn reset(&mut self) -> OperationReport {
        let state = self.store.reset();
        info!(session = %self.id, version = state.version, "working state reset");
        let report = OperationReport::new(Outcome::Applied, RESET_MESSAGE, state);
        self.last_kind = ExportKind::Cleaned;
        report
    }

    /// Split the working table into train and test parts.
    ///
    /// Uses the configured seed; `test_fraction` falls back to the configured
    /// default. The working state is not changed. Returns `Ok(None)` when no
    /// target is selected.
    pub fn split(
        &mut self,
        target: &str,
        test_fraction: Option<f64>,
    ) -> std::result::Result<Option<&SplitResult>, OperationError> {
        let fraction = test_fraction.unwrap_or(self.config.split.test_fraction);
        let table = Arc::clone(self.store.table());

        if let Err(error) = self
            .engine
            .validation()
            .check_split(&table, target, fraction)
        {
            if error.kind.is_silent() {
                debug!(session = %self.id, "no split target selected");
                return Ok(None);
            }
            warn!(
                session = %self.id,
                split_target = target,
                kind = ?error.kind,
                "split refused: {}",
                error.message
            );
            return Err(error);
        }

        let result = train_test_split(&table, target, fraction, self.config.split.seed)?;
        info!(
            session = %self.id,
            split_target = target,
            train_rows = result.train.row_count(),
            test_rows = result.test.row_count(),
            seed = result.seed,
            "split complete"
        );
        Ok(Some(self.last_split.insert(result)))
    }

    /// Most recent split, if any.
    pub fn last_split(&self) -> Option<&SplitResult> {
        self.last_split.as_ref()
    }

    /// Export naming context of the most recent transformation.
    pub fn latest_export_kind(&self) -> ExportKind {
        self.last_kind
    }

    /// Serialize the working table, or a split part, to CSV.
    pub fn export(&self, kind: ExportKind) -> Result<Export> {
        let table = match kind {
            ExportKind::Train => &self.last_split.as_ref().ok_or(TabprepError::NoSplit)?.train,
            ExportKind::Test => &self.last_split.as_ref().ok_or(TabprepError::NoSplit)?.test,
            _ => self.store.table().as_ref(),
        };
        let export = Export::new(kind, table)?;
        debug!(session = %self.id, file = %export.file_name, bytes = export.bytes.len(), "export ready");
        Ok(export)
    }

    /// Leading rows of the working table; defaults to the configured count.
    pub fn preview(&self, limit: Option<usize>) -> Preview {
        preview(self.table(), limit.unwrap_or(self.config.preview_rows))
    }

    /// Column names of a kind, for selection lists.
    pub fn column_names(&self, kind: ColumnKind) -> Vec<String> {
        self.view()
            .column_names(kind)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Value frequencies of one column.
    pub fn value_counts(
        &self,
        column: &str,
    ) -> std::result::Result<IndexMap<String, usize>, OperationError> {
        value_counts(self.table(), column)
    }

    /// Pair frequencies of two columns.
    pub fn crosstab(
        &self,
        x: &str,
        y: &str,
    ) -> std::result::Result<Vec<CrossCount>, OperationError> {
        crosstab(self.table(), x, y)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("file", &self.source.file)
            .field("store", &self.store)
            .field("has_split", &self.last_split.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transform::FillStrategy;

    const CSV: &str = "age,city,label\n30,NYC,yes\n,LA,no\n25,NYC,yes\n40,,no\n";

    fn session() -> Session {
        Session::from_upload(&Upload::new("people.csv", CSV), &TabprepConfig::default()).unwrap()
    }

    #[test]
    fn test_apply_updates_state_and_view() {
        let mut s = session();
        assert_eq!(s.view().total_missing, 2);

        let report = s.apply(&Operation::FillMissing {
            column: "age".into(),
            strategy: FillStrategy::Median,
        });

        assert!(report.is_applied());
        assert_eq!(report.message, "Filled missing values in 'age' with median.");
        assert_eq!(report.version, 1);
        assert!(s.state().modified);
        assert_eq!(s.view().total_missing, 1);
        assert_eq!(s.view().version, 1);
        assert_eq!(s.status_message(), Some("Data has been modified (unsaved changes)"));
    }

    #[test]
    fn test_refusal_leaves_state() {
        let mut s = session();
        let report = s.apply(&Operation::ConvertType {
            column: "city".into(),
            target: "int".parse().unwrap(),
        });

        assert_eq!(report.outcome, Outcome::Rejected);
        assert_eq!(report.error.as_ref().unwrap().kind, ErrorKind::TypeMismatch);
        assert_eq!(report.version, 0);
        assert!(!s.state().modified);
    }

    #[test]
    fn test_empty_selection_is_silent() {
        let mut s = session();
        let report = s.apply(&Operation::DropNulls { column: String::new() });
        assert_eq!(report.outcome, Outcome::Unchanged);
        assert!(report.message.is_empty());
        assert!(report.error.is_none());
    }

    #[test]
    fn test_reset_restores_upload() {
        let mut s = session();
        let original = s.table().clone();
        s.apply(&Operation::DropNulls { column: "age".into() });
        assert_eq!(s.table().row_count(), 3);

        let report = s.reset();
        assert_eq!(report.message, "✓ Reset to original data");
        assert_eq!(s.table().as_ref(), original.as_ref());
        assert!(!s.state().modified);
        assert_eq!(s.state().version, 2);
    }

    #[test]
    fn test_export_requires_split() {
        let mut s = session();
        assert!(matches!(s.export(ExportKind::Train), Err(TabprepError::NoSplit)));

        s.split("label", Some(0.5)).unwrap().unwrap();
        let train = s.export(ExportKind::Train).unwrap();
        assert_eq!(train.file_name, "train_data.csv");
        let text = String::from_utf8(train.bytes).unwrap();
        assert!(text.starts_with("age,city,label\n"));
    }

    #[test]
    fn test_latest_export_kind() {
        let mut s = session();
        s.apply(&Operation::Normalize);
        assert_eq!(s.latest_export_kind(), ExportKind::Normalized);
        s.reset();
        assert_eq!(s.latest_export_kind(), ExportKind::Cleaned);
    }

    #[test]
    fn test_split_target_missing() {
        let mut s = session();
        let err = s.split("target", None).unwrap_err();
        assert_eq!(err.message, "Target variable 'target' not found in data.");
        assert!(s.last_split().is_none());
    }

    #[test]
    fn test_split_without_target_is_silent() {
        let mut s = session();
        assert!(s.split("", Some(0.3)).unwrap().is_none());
        assert!(s.last_split().is_none());
        assert!(matches!(s.export(ExportKind::Test), Err(TabprepError::NoSplit)));
    }

    #[test]
    fn test_discretize_uses_configured_bins() {
        let csv = "v\n0\n1\n2\n3\n4\n5\n";
        let mut config = TabprepConfig::default();
        config.discretize_bins = 2;
        let mut s = Session::from_upload(&Upload::new("v.csv", csv), &config).unwrap();

        let operation: Operation =
            serde_json::from_str(r#"{"op": "discretize", "column": "v"}"#).unwrap();
        let report = s.apply(&operation);
        assert_eq!(report.message, "Column 'v' discretized into 2 equal-width bins.");
        assert_eq!(s.table().column("v").unwrap().distinct_count(), 2);

        s.reset();
        s.apply(&Operation::Discretize {
            column: "v".into(),
            bins: Some(3),
        });
        assert_eq!(s.table().column("v").unwrap().distinct_count(), 3);
    }
}
