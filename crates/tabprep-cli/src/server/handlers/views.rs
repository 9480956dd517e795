//! Read-only handlers over the current table.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabprep::ColumnKind;
use tabprep::view::{CrossCount, Preview};

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Query parameters for column listing.
#[derive(Deserialize)]
pub struct ColumnsQuery {
    pub kind: Option<String>,
}

#[derive(Serialize)]
pub struct ColumnsResponse {
    pub kind: ColumnKind,
    pub columns: Vec<String>,
}

/// GET /api/sessions/:id/columns?kind=all|numerical|categorical
pub async fn get_columns(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ColumnsQuery>,
) -> Result<Json<ColumnsResponse>, ApiError> {
    let kind = match query.kind.as_deref() {
        Some(kind) => kind.parse().map_err(ApiError::BadRequest)?,
        None => ColumnKind::All,
    };

    let session = state.session(&id).await?;
    let session = session.read().await;
    Ok(Json(ColumnsResponse {
        kind,
        columns: session.column_names(kind),
    }))
}

/// Query parameters for data preview.
#[derive(Deserialize)]
pub struct PreviewQuery {
    pub limit: Option<usize>,
}

/// GET /api/sessions/:id/preview?limit=
pub async fn get_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<Preview>, ApiError> {
    let session = state.session(&id).await?;
    let session = session.read().await;
    Ok(Json(session.preview(query.limit)))
}

#[derive(Serialize)]
pub struct ValueCountsResponse {
    pub column: String,
    pub counts: IndexMap<String, usize>,
}

/// GET /api/sessions/:id/value-counts/:column
pub async fn get_value_counts(
    State(state): State<AppState>,
    Path((id, column)): Path<(String, String)>,
) -> Result<Json<ValueCountsResponse>, ApiError> {
    let session = state.session(&id).await?;
    let session = session.read().await;
    let counts = session.value_counts(&column)?;
    Ok(Json(ValueCountsResponse { column, counts }))
}

/// Query parameters for a cross tabulation.
#[derive(Deserialize)]
pub struct CrosstabQuery {
    pub x: String,
    pub y: String,
}

/// GET /api/sessions/:id/crosstab?x=&y=
pub async fn get_crosstab(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<CrosstabQuery>,
) -> Result<Json<Vec<CrossCount>>, ApiError> {
    let session = state.session(&id).await?;
    let session = session.read().await;
    Ok(Json(session.crosstab(&query.x, &query.y)?))
}
