use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::disclosure::DisclosureError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized { redirect_to: String },

    #[error("Authentication still pending")]
    AuthPending,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Auth provider error: {0}")]
    Auth(#[from] AuthError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<DisclosureError> for AppError {
    fn from(e: DisclosureError) -> Self {
        AppError::NotFound(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized { .. } => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::AuthPending => (
                StatusCode::SERVICE_UNAVAILABLE,
                "AUTH_PENDING",
                "Authentication status is not yet known".to_string(),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Auth(e) => {
                tracing::error!("Auth provider error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "AUTH_PROVIDER_ERROR",
                    "The authentication provider could not be reached".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message
        });
        if let AppError::Unauthorized { redirect_to } = &self {
            error["redirect"] = json!(redirect_to);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
