use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::{domain::error::DomainError, presentation::response::ApiResponse};

/// Error surfaced at the HTTP boundary.
/// Internal causes are logged here and never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("internal server error")]
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::BatchShape(msg) => ApiError::BadRequest(msg),
            DomainError::InvalidImage(rejection) => ApiError::BadRequest(rejection.to_string()),
            DomainError::UserNotFound => ApiError::NotFound("user not found".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(cause) => {
                error!(cause = %cause, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ApiResponse::failed(self.to_string()))).into_response()
    }
}
