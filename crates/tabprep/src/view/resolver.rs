//! Keeps the derived view in step with the table store.

use std::sync::{Arc, RwLock};

use tracing::debug;

use super::summary::DerivedView;
use crate::store::{TableObserver, WorkingState};

/// Recomputes the derived view on every working-state change.
#[derive(Debug, Default)]
pub struct ViewResolver {
    current: RwLock<Arc<DerivedView>>,
}

impl ViewResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently computed view.
    pub fn current(&self) -> Arc<DerivedView> {
        match self.current.read() {
            Ok(view) => Arc::clone(&view),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

impl TableObserver for ViewResolver {
    fn table_changed(&self, state: &WorkingState) {
        let view = Arc::new(DerivedView::compute(state));
        debug!(
            version = view.version,
            rows = view.row_count,
            columns = view.column_count,
            missing = view.total_missing,
            "derived view recomputed"
        );
        match self.current.write() {
            Ok(mut current) => *current = view,
            Err(poisoned) => *poisoned.into_inner() = view,
        }
    }
}
