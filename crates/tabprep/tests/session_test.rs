//! Integration tests for the table store, derived views and sessions.

use std::sync::{Arc, Mutex};

use tabprep::{
    DerivedView, ErrorKind, Operation, Outcome, Parser, Session, SourceMetadata, TableObserver,
    TableStore, TabprepConfig, Upload, ViewResolver, WorkingState,
};

const CSV: &str = "id,score,grade\n1,10.5,a\n2,,b\n3,7.5,\n4,9.0,a\n";

fn session() -> Session {
    Session::from_upload(&Upload::new("scores.csv", CSV), &TabprepConfig::default())
        .expect("Failed to parse upload")
}

/// Records every view it is shown.
#[derive(Default)]
struct ViewLog {
    views: Mutex<Vec<DerivedView>>,
}

impl TableObserver for ViewLog {
    fn table_changed(&self, state: &WorkingState) {
        self.views.lock().unwrap().push(DerivedView::compute(state));
    }
}

// =============================================================================
// Store
// =============================================================================

#[test]
fn test_store_notifies_every_observer() {
    let table = Parser::new().parse_str(CSV).unwrap();
    let mut store = TableStore::new(table.clone());

    let log = Arc::new(ViewLog::default());
    let resolver = Arc::new(ViewResolver::new());
    store.subscribe(log.clone());
    store.subscribe(resolver.clone());

    store.set(table.take_rows(&[0, 1]));
    store.reset();

    let views = log.views.lock().unwrap();
    let rows: Vec<usize> = views.iter().map(|v| v.row_count).collect();
    assert_eq!(rows, vec![4, 2, 4]);
    assert_eq!(resolver.current().as_ref(), views.last().unwrap());
}

#[test]
fn test_store_versions_increase() {
    let table = Parser::new().parse_str(CSV).unwrap();
    let mut store = TableStore::new(table.clone());

    let mut versions = Vec::new();
    for _ in 0..3 {
        versions.push(store.set(table.clone()).version);
    }
    versions.push(store.reset().version);
    assert_eq!(versions, vec![1, 2, 3, 4]);
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn test_reset_after_modification_restores_upload() {
    let mut s = session();
    let original = s.table().clone();

    s.apply(&Operation::DropNulls { column: "score".into() });
    s.apply(&Operation::Normalize);
    assert_ne!(s.table(), &original);

    s.reset();
    assert_eq!(s.table(), &original);
    assert!(!s.state().modified);
    assert_eq!(s.view().total_missing, 2);
    assert_eq!(s.status_message(), None);
}

#[test]
fn test_sessions_are_independent() {
    let mut a = session();
    let b = session();
    assert_ne!(a.id(), b.id());

    a.apply(&Operation::DropNulls { column: "grade".into() });
    assert_eq!(a.table().row_count(), 3);
    assert_eq!(b.table().row_count(), 4);
    assert_eq!(b.state().version, 0);
}

#[test]
fn test_informational_refusal_is_unchanged() {
    let upload = Upload::new("labels.csv", "name,grade\nann,a\nbob,b\n");
    let mut s = Session::from_upload(&upload, &TabprepConfig::default()).unwrap();

    let report = s.apply(&Operation::Normalize);
    assert_eq!(report.outcome, Outcome::Unchanged);
    assert_eq!(report.message, "No numeric columns to normalize.");
    assert_eq!(s.state().version, 0);
}

#[test]
fn test_report_serializes_error() {
    let mut s = session();
    let report = s.apply(&Operation::Discretize {
        column: "grade".into(),
        bins: Some(3),
    });

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"], "rejected");
    assert_eq!(json["error"]["kind"], "type_mismatch");
    assert_eq!(json["error"]["column"], "grade");
    assert_eq!(report.error.unwrap().kind, ErrorKind::TypeMismatch);
}

#[test]
fn test_session_from_parsed_table() {
    let table = Parser::new().parse_str(CSV).unwrap();
    let source = SourceMetadata::new("scores.csv", "sha256:00".into(), 0, 4, 3);
    let mut s = Session::new(table, source, TabprepConfig::default());

    let split = s.split("grade", None);
    assert_eq!(split.unwrap_err().kind, ErrorKind::InvalidParameter);

    s.apply(&Operation::DropNulls { column: "grade".into() });
    let split = s.split("grade", Some(0.34)).unwrap().unwrap();
    assert_eq!(split.train_shape(), (1, 3));
    assert_eq!(split.test_shape(), (2, 3));
}
