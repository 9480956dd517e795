//! Versioned table store with change notification.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::trace;

use crate::table::Table;

/// Message shown while the working table differs from the upload.
pub const MODIFIED_MESSAGE: &str = "Data has been modified (unsaved changes)";

/// Message shown after a reset.
pub const RESET_MESSAGE: &str = "✓ Reset to original data";

/// The current table of a session.
#[derive(Debug, Clone, Serialize)]
pub struct WorkingState {
    #[serde(skip)]
    pub table: Arc<Table>,
    /// True once any transformation has replaced the uploaded table.
    pub modified: bool,
    /// Increments on every replacement, resets included.
    pub version: u64,
}

impl WorkingState {
    /// Status line for the modified indicator, if any.
    pub fn status_message(&self) -> Option<&'static str> {
        self.modified.then_some(MODIFIED_MESSAGE)
    }
}

/// Receives a notification after every replacement of the working state.
pub trait TableObserver: Send + Sync {
    fn table_changed(&self, state: &WorkingState);
}

/// Holds the original upload and the current working state.
///
/// Every update replaces the whole working state; observers are notified
/// synchronously afterwards.
pub struct TableStore {
    original: Arc<Table>,
    state: WorkingState,
    observers: Vec<Arc<dyn TableObserver>>,
}

impl TableStore {
    /// Create a store from a freshly uploaded table.
    pub fn new(table: Table) -> Self {
        let original = Arc::new(table);
        Self {
            state: WorkingState {
                table: Arc::clone(&original),
                modified: false,
                version: 0,
            },
            original,
            observers: Vec::new(),
        }
    }

    /// Current working state.
    pub fn get(&self) -> &WorkingState {
        &self.state
    }

    /// Current table.
    pub fn table(&self) -> &Arc<Table> {
        &self.state.table
    }

    /// The table as uploaded.
    pub fn original(&self) -> &Arc<Table> {
        &self.original
    }

    /// Replace the working table, marking the state modified.
    pub fn set(&mut self, table: Table) -> &WorkingState {
        self.replace(Arc::new(table), true)
    }

    /// Restore the uploaded table and clear the modified flag.
    pub fn reset(&mut self) -> &WorkingState {
        self.replace(Arc::clone(&self.original), false)
    }

    /// Register an observer. It is notified immediately with the current state.
    pub fn subscribe(&mut self, observer: Arc<dyn TableObserver>) {
        observer.table_changed(&self.state);
        self.observers.push(observer);
    }

    fn replace(&mut self, table: Arc<Table>, modified: bool) -> &WorkingState {
        self.state = WorkingState {
            table,
            modified,
            version: self.state.version + 1,
        };
        trace!(
            version = self.state.version,
            modified,
            observers = self.observers.len(),
            "working state replaced"
        );
        for observer in &self.observers {
            observer.table_changed(&self.state);
        }
        &self.state
    }
}

impl fmt::Debug for TableStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableStore")
            .field("version", &self.state.version)
            .field("modified", &self.state.modified)
            .field("rows", &self.state.table.row_count())
            .field("columns", &self.state.table.column_count())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::table::{Column, ColumnType, Value};

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(u64, bool)>>,
    }

    impl TableObserver for Recorder {
        fn table_changed(&self, state: &WorkingState) {
            self.seen.lock().unwrap().push((state.version, state.modified));
        }
    }

    fn table(values: &[i64]) -> Table {
        Table::new(vec![Column::new(
            "n",
            ColumnType::Integer,
            values.iter().map(|&v| Value::Integer(v)).collect(),
        )])
        .unwrap()
    }

    #[test]
    fn test_set_and_reset() {
        let mut store = TableStore::new(table(&[1, 2]));
        assert!(!store.get().modified);
        assert_eq!(store.get().status_message(), None);

        store.set(table(&[1]));
        assert!(store.get().modified);
        assert_eq!(store.get().version, 1);
        assert_eq!(store.get().status_message(), Some(MODIFIED_MESSAGE));

        store.reset();
        assert!(!store.get().modified);
        assert_eq!(store.get().version, 2);
        assert!(Arc::ptr_eq(store.table(), store.original()));
    }

    #[test]
    fn test_observers_notified_in_order() {
        let mut store = TableStore::new(table(&[1]));
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        store.set(table(&[2]));
        store.reset();

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec![(0, false), (1, true), (2, false)]
        );
    }
}
