//! Error types for the REST API.
//!
//! Every error becomes a JSON envelope `{ "success": false, "message" }`
//! with the matching HTTP status. Internal failures are logged with
//! detail and surfaced to clients as a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use defter_core::CoreError;
use defter_db::DbError;

/// API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthFailed(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            // Never leak internals to clients
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            error!(%detail, "Internal API error");
        }

        let body = Json(json!({
            "success": false,
            "message": self.client_message(),
        }));

        (self.status(), body).into_response()
    }
}

/// Map database and domain errors onto HTTP semantics.
///
/// Business rule violations (insufficient balance, paid invoice,
/// insufficient stock, validation) are client errors; infrastructure
/// failures are 500s.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::Conflict(err.to_string()),
            DbError::ForeignKeyViolation { .. } => ApiError::BadRequest(err.to_string()),
            DbError::Domain(core) => core.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EntryNotFound(_) => ApiError::NotFound(err.to_string()),
            // InsufficientBalance, InvoicePaid, InsufficientStock, Validation
            other => ApiError::BadRequest(other.to_string()),
        }
    }
}

impl From<defter_core::ValidationError> for ApiError {
    fn from(err: defter_core::ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use defter_core::Money;

    #[test]
    fn insufficient_balance_is_a_client_error() {
        let err: ApiError = DbError::Domain(CoreError::InsufficientBalance {
            current: Money::from_kurus(700),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.client_message().contains("Insufficient cash balance"));
    }

    #[test]
    fn internal_errors_are_not_leaked() {
        let err = ApiError::Internal("sqlite disk I/O error at /secret/path".to_string());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Cash book entry", "abc").into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
