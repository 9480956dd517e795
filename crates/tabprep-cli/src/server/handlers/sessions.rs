//! Session lifecycle handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State, rejection::BytesRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tabprep::{DerivedView, OperationReport, Session, SourceMetadata, Upload};
use tracing::info;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for an upload.
#[derive(Deserialize)]
pub struct UploadParams {
    pub filename: Option<String>,
}

/// Working state of a session with its derived view.
#[derive(Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub source: SourceMetadata,
    pub upload_message: String,
    pub status_message: Option<&'static str>,
    pub view: DerivedView,
}

impl SessionResponse {
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.id().to_string(),
            source: session.source().clone(),
            upload_message: session.source().status_message(),
            status_message: session.status_message(),
            view: session.view().as_ref().clone(),
        }
    }
}

/// Result of an action together with the view it produced.
#[derive(Serialize)]
pub struct ActionResponse {
    pub report: OperationReport,
    pub status_message: Option<&'static str>,
    pub view: DerivedView,
}

impl ActionResponse {
    pub fn new(report: OperationReport, session: &Session) -> Self {
        Self {
            report,
            status_message: session.status_message(),
            view: session.view().as_ref().clone(),
        }
    }
}

/// POST /api/sessions?filename=<name>
///
/// The body limit comes from `server.max_upload_bytes`.
pub async fn create_session(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(format!(
                "Upload exceeds the {} byte limit.",
                state.config.server.max_upload_bytes
            ))
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })?;
    let filename = params
        .filename
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing 'filename' query parameter".to_string()))?;

    let upload = Upload::new(filename, body.to_vec());
    let session = Session::from_upload(&upload, &state.config)?;
    let response = SessionResponse::from_session(&session);
    state.insert(session).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session(&id).await?;
    let session = session.read().await;
    Ok(Json(SessionResponse::from_session(&session)))
}

/// DELETE /api/sessions/:id
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove(&id).await {
        info!(session = %id, "session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session not found: {}", id)))
    }
}

/// POST /api/sessions/:id/reset
pub async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, ApiError> {
    let session = state.session(&id).await?;
    let mut session = session.write().await;
    let report = session.reset();
    Ok(Json(ActionResponse::new(report, &session)))
}
