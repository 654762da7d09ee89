use amparo_assist::AssistError;
use amparo_core::error::CoreError;
use amparo_store::repositories::ServiceError;
use amparo_store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::address::LookupError;

/// Application-level error type for HTTP handlers.
///
/// Wraps domain, store, and collaborator errors and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON
/// error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `amparo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record-store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An error from the AI-assist collaborator.
    #[error(transparent)]
    Assist(#[from] AssistError),

    /// An error from the address-lookup collaborator.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(core) => AppError::Core(core),
            ServiceError::Store(store) => AppError::Store(store),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(format!("Validation failed: {err}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Record store errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Record store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "The record store rejected the operation".to_string(),
                )
            }

            // --- AI assist errors ---
            AppError::Assist(AssistError::Unavailable) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ASSIST_UNAVAILABLE",
                "Text assist is not configured".to_string(),
            ),
            AppError::Assist(err) => {
                tracing::warn!(error = %err, "Assist collaborator error");
                (
                    StatusCode::BAD_GATEWAY,
                    "ASSIST_ERROR",
                    "Text assist could not produce a suggestion".to_string(),
                )
            }

            // --- Address lookup errors ---
            AppError::Lookup(LookupError::InvalidCode(code)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_POSTAL_CODE",
                format!("Not a valid postal code: {code}"),
            ),
            AppError::Lookup(LookupError::NotFound(code)) => (
                StatusCode::NOT_FOUND,
                "ADDRESS_NOT_FOUND",
                format!("No address found for postal code {code}"),
            ),
            AppError::Lookup(err) => {
                tracing::warn!(error = %err, "Address lookup error");
                (
                    StatusCode::BAD_GATEWAY,
                    "LOOKUP_ERROR",
                    "Address lookup failed".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
