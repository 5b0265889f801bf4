//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. `AppError` renders as a JSON
//! body `{"error": "..."}`:
//!
//! | Condition                         | Status |
//! |-----------------------------------|--------|
//! | missing field / malformed body    | 400    |
//! | ID or referenced row not found    | 404    |
//! | delete blocked by references      | 409    |
//! | order total out of decimal range  | 422    |
//! | store or serialization failure    | 500    |
//!
//! Server errors are captured to Sentry and their details are never sent to
//! the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use customer_desk_core::{Entity, ValidationError};

use crate::db::RepositoryError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required fields missing, or an empty update.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body absent, not JSON, or fields of the wrong type.
    #[error("{0}")]
    BadRequest(String),

    /// No record of this kind has the requested ID.
    #[error("{}", .0.not_found_message())]
    NotFound(Entity),

    /// The write would break a reference between records.
    #[error("{0}")]
    Conflict(String),

    /// The request is well formed but its result cannot be represented.
    #[error("{0}")]
    Unprocessable(String),

    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Response could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::MissingReference(entity) => Self::NotFound(entity),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            RepositoryError::InvalidValue(message) => Self::BadRequest(message),
            other => Self::Database(other),
        }
    }
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Serialization(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound(Entity::CustomerAccount);
        assert_eq!(err.to_string(), "Customer account not found");

        let err = AppError::Validation(ValidationError::MissingFields(vec!["price".into()]));
        assert_eq!(err.to_string(), "Missing required fields: price");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            AppError::Validation(ValidationError::EmptyPayload).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::BadRequest("test".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound(Entity::Order).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("test".to_string()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unprocessable("test".to_string()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Internal("test".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_translate() {
        let err = AppError::from(RepositoryError::MissingReference(Entity::Product));
        assert!(matches!(err, AppError::NotFound(Entity::Product)));

        let err = AppError::from(RepositoryError::Conflict("in use".into()));
        assert!(matches!(err, AppError::Conflict(_)));

        let err = AppError::from(RepositoryError::InvalidValue("price is out of range".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "price is out of range");

        let err = AppError::from(RepositoryError::DataCorruption("bad row".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = render(AppError::NotFound(Entity::Customer)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Customer not found"}));
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, body) =
            render(AppError::Database(RepositoryError::DataCorruption("secret".into()))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }
}
