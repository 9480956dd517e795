//! Handlers that transform or split a session's table.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tabprep::{Operation, Outcome, SplitResult, Value};

use super::sessions::ActionResponse;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// POST /api/sessions/:id/operations
///
/// Rejected operations become error responses; no-ops return the report.
pub async fn apply_operation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(operation): Json<Operation>,
) -> Result<Json<ActionResponse>, ApiError> {
    let session = state.session(&id).await?;
    let mut session = session.write().await;

    let mut report = session.apply(&operation);
    if report.outcome == Outcome::Rejected {
        if let Some(error) = report.error.take() {
            return Err(ApiError::Operation(error));
        }
    }
    Ok(Json(ActionResponse::new(report, &session)))
}

/// Request body for a split.
#[derive(Deserialize)]
pub struct SplitRequest {
    pub target: String,
    /// Defaults to the configured test fraction.
    pub test_size: Option<f64>,
}

/// Shapes and classes of a split; the parts themselves are fetched via export.
#[derive(Serialize)]
pub struct SplitSummary {
    pub target: String,
    /// Original target values, indexed by code.
    pub classes: Vec<Value>,
    pub test_fraction: f64,
    pub seed: u64,
    pub train_shape: (usize, usize),
    pub test_shape: (usize, usize),
}

impl From<&SplitResult> for SplitSummary {
    fn from(split: &SplitResult) -> Self {
        Self {
            target: split.target.clone(),
            classes: split.classes.clone(),
            test_fraction: split.test_fraction,
            seed: split.seed,
            train_shape: split.train_shape(),
            test_shape: split.test_shape(),
        }
    }
}

#[derive(Serialize)]
pub struct SplitResponse {
    /// `unchanged` when no target was selected.
    pub outcome: Outcome,
    pub message: String,
    #[serde(flatten)]
    pub summary: Option<SplitSummary>,
}

/// POST /api/sessions/:id/split
pub async fn split_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SplitRequest>,
) -> Result<Json<SplitResponse>, ApiError> {
    let session = state.session(&id).await?;
    let mut session = session.write().await;

    let response = match session.split(&req.target, req.test_size)? {
        Some(split) => SplitResponse {
            outcome: Outcome::Applied,
            message: split.status_message(),
            summary: Some(SplitSummary::from(split)),
        },
        None => SplitResponse {
            outcome: Outcome::Unchanged,
            message: String::new(),
            summary: None,
        },
    };
    Ok(Json(response))
}
