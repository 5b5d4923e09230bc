use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid JSON payload: {0}")]
    MalformedPayload(String),
    #[error("Failed to store event: {0}")]
    StoreWrite(#[source] StoreError),
    #[error("Failed to load actions: {0}")]
    StoreRead(#[source] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            ApiError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::StoreWrite(_) | ApiError::StoreRead(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Store internals stay in the log, not in the response.
        let error_message = match &self {
            ApiError::StoreWrite(_) => "Failed to store event".to_string(),
            ApiError::StoreRead(_) => "Failed to load actions".to_string(),
            _ => self.to_string(),
        };

        if status_code.is_server_error() {
            tracing::error!(status = %status_code, error = %self, "Request failed");
        }

        (status_code, Json(json!({ "error": error_message }))).into_response()
    }
}
