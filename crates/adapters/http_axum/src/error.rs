//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use bedsync_domain::error::{BedSyncError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`BedSyncError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(BedSyncError);

impl From<BedSyncError> for ApiError {
    fn from(err: BedSyncError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            BedSyncError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            BedSyncError::Unsupported(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            BedSyncError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            err @ BedSyncError::NoBeds => (StatusCode::NOT_FOUND, err.to_string()),
            BedSyncError::Remote(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            BedSyncError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
