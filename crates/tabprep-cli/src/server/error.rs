//! API error types and handling.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tabprep::{ErrorKind, OperationError, TabprepError};

/// API error type.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from client.
    BadRequest(String),
    /// Upload body over the configured limit.
    PayloadTooLarge(String),
    /// A refused operation.
    Operation(OperationError),
    /// Error from the tabprep library.
    Tabprep(TabprepError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<String>,
}

fn operation_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ColumnNotFound => StatusCode::NOT_FOUND,
        ErrorKind::TypeMismatch | ErrorKind::InvalidParameter | ErrorKind::NoModeFound => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ErrorKind::EmptyInput | ErrorKind::NoNumericColumns => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, column) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found".to_string(), msg, None),
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request".to_string(), msg, None)
            }
            ApiError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "payload_too_large".to_string(),
                msg,
                None,
            ),
            ApiError::Operation(e) => (
                operation_status(e.kind),
                e.kind.code().to_string(),
                e.message,
                e.column,
            ),
            ApiError::Tabprep(TabprepError::Operation(e)) => {
                return ApiError::Operation(e).into_response();
            }
            ApiError::Tabprep(e @ TabprepError::NoSplit) => {
                (StatusCode::BAD_REQUEST, "no_split".to_string(), e.to_string(), None)
            }
            ApiError::Tabprep(e) => (
                StatusCode::BAD_REQUEST,
                "tabprep_error".to_string(),
                e.to_string(),
                None,
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                message,
                column,
            }),
        )
            .into_response()
    }
}

impl From<TabprepError> for ApiError {
    fn from(err: TabprepError) -> Self {
        ApiError::Tabprep(err)
    }
}

impl From<OperationError> for ApiError {
    fn from(err: OperationError) -> Self {
        ApiError::Operation(err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            ApiError::Operation(e) => write!(f, "Operation refused: {}", e),
            ApiError::Tabprep(e) => write!(f, "tabprep error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {}
