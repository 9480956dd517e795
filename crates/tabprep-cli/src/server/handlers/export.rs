//! CSV download handler.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use tabprep::ExportKind;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// GET /api/sessions/:id/export/:kind
///
/// `kind` may be `latest` for the name matching the last transformation.
pub async fn export_csv(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let session = state.session(&id).await?;
    let session = session.read().await;

    let kind = if kind.eq_ignore_ascii_case("latest") {
        session.latest_export_kind()
    } else {
        kind.parse::<ExportKind>().map_err(ApiError::BadRequest)?
    };
    let export = session.export(kind)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.bytes,
    )
        .into_response())
}
