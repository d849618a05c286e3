use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::engine::IngestionError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No authorization header")]
    MissingAuthorization,
    #[error("Invalid authentication")]
    InvalidAuthentication,
    #[error("Invalid CSV data format")]
    InvalidCsvData,
    #[error("CSV payload is too large")]
    PayloadTooLarge,
    #[error("{0}")]
    BadRequest(String),
    #[error("An active subscription is required")]
    SubscriptionRequired,
    #[error("Failed to create upload record")]
    UploadCreation,
    #[error("Failed to insert transactions")]
    InsertFailed,
    #[error("{0}")]
    Internal(String)
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingAuthorization | AppError::InvalidAuthentication => StatusCode::UNAUTHORIZED,
            AppError::InvalidCsvData | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::SubscriptionRequired => StatusCode::FORBIDDEN,
            AppError::UploadCreation | AppError::InsertFailed | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<IngestionError> for AppError {
    fn from(error: IngestionError) -> Self {
        match error {
            IngestionError::UploadCreation(_) => AppError::UploadCreation,
            IngestionError::Insert { .. } => AppError::InsertFailed,
            other => AppError::Internal(other.to_string())
        }
    }
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        AppError::Internal(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
