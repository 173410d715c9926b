use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ranking::plan::RankError;
use crate::scoring::WeightError;
use crate::storage::StorageError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid rank move: {0}")]
    InvalidRankMove(String),

    /// A multi-record rank or score update did not go through as a whole.
    #[error("Consistency error: {0}")]
    Consistency(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::JobNotFound(_) | StoreError::ResumeNotFound(_) => {
                AppError::NotFound(e.to_string())
            }
            StoreError::StalePlan { .. }
            | StoreError::PartialUpdate { .. }
            | StoreError::RankConflict(_) => AppError::Consistency(e.to_string()),
            StoreError::Database(db) => AppError::Database(db.to_string()),
        }
    }
}

impl From<RankError> for AppError {
    fn from(e: RankError) -> Self {
        match e {
            RankError::AlreadyFirst | RankError::AlreadyLast => {
                AppError::InvalidRankMove(e.to_string())
            }
            RankError::NotRanked(_) => AppError::NotFound(e.to_string()),
            RankError::NotDense(_) => AppError::Consistency(e.to_string()),
        }
    }
}

impl From<WeightError> for AppError {
    fn from(e: WeightError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::InvalidRankMove(msg) => {
                (StatusCode::BAD_REQUEST, "INVALID_RANK_MOVE", msg.clone())
            }
            AppError::Consistency(msg) => {
                tracing::error!("Consistency error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONSISTENCY_ERROR",
                    "Ranking update did not complete; no partial changes were kept".to_string(),
                )
            }
            AppError::Database(msg) => {
                tracing::error!("Database error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
