//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use space_core::error::{AppError, ErrorKind};

use crate::dto::response::ApiResponse;

/// `AppError` carried to the HTTP boundary.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Upstream
            | ErrorKind::Internal
            | ErrorKind::Cache
            | ErrorKind::Configuration
            | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if self.0.is_client_error() {
            ApiResponse::failed(status, self.0.message)
        } else {
            tracing::error!(kind = %self.0.kind, error = %self.0.message, "Request failed");
            ApiResponse::error(status, self.0.message)
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError(AppError::validation("x")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(AppError::not_found("x")).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AppError::upstream("x")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
