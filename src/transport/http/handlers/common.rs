use crate::app::ServiceError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match self {
            ServiceError::Validation(violations) => {
                (StatusCode::BAD_REQUEST, Json(violations)).into_response()
            }
            ServiceError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, self.to_string()).into_response()
            }
            ServiceError::DuplicateBrand(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ServiceError::Upload(message) => {
                error!(%message, "car upload failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error during car upload: {}", message),
                )
                    .into_response()
            }
            ServiceError::Report(message) => {
                error!(%message, "report generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error during report generation: {}", message),
                )
                    .into_response()
            }
            ServiceError::Store(err) => {
                error!(error = %err, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

pub fn json_422(err: JsonRejection, expected: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("Invalid JSON body: {} (expected: {})", err.body_text(), expected),
    )
        .into_response()
}
