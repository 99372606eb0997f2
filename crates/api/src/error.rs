//! Maps service errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use folders::FolderError;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub FolderError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            FolderError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
            FolderError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
            FolderError::Database(err) if err.is_unique_violation() => StatusCode::CONFLICT,
            FolderError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Database text stays in the logs.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self.0);
            "internal server error".to_owned()
        } else if status == StatusCode::CONFLICT {
            "a folder with this name already exists".to_owned()
        } else {
            self.0.to_string()
        };

        let body = json!({ "code": self.0.code(), "message": message });
        (status, Json(body)).into_response()
    }
}
