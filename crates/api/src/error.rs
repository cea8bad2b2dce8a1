//! Error responses.
//!
//! Every failure leaves the API as `{"error": <kind>, "message": <text>}`
//! where `kind` is a stable snake_case identifier.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

use larder_core::auth::{AuthError, PasswordError};
use larder_core::homepage::HomepageError;
use larder_core::leads::LeadError;
use larder_shared::AppError;

/// Handler result.
pub type ApiResult<T> = Result<T, ApiError>;

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    kind: String,
    message: String,
}

impl ApiError {
    /// Creates an error with an explicit status and kind.
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Builds an error from a domain status code and error code.
    fn from_codes(status: u16, code: &str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            kind: code.to_ascii_lowercase(),
            message,
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = if self.status.is_server_error() {
            error!(kind = %self.kind, error = %self.message, "Request failed");
            "An internal error occurred".to_string()
        } else {
            self.message
        };

        (
            self.status,
            Json(json!({ "error": self.kind, "message": message })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_codes(err.status_code(), err.error_code(), err.message().to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::from_codes(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => AuthError::WeakPassword(err).into(),
            other => AppError::Internal(other.to_string()).into(),
        }
    }
}

impl From<HomepageError> for ApiError {
    fn from(err: HomepageError) -> Self {
        Self::from_codes(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<LeadError> for ApiError {
    fn from(err: LeadError) -> Self {
        Self::from_codes(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        AppError::Database(err.to_string()).into()
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("blocking task failed: {err}")).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_path", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_domain_error_renders_kind_and_message() {
        let (status, body) = body_json(HomepageError::AlreadyPublished(3).into()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "version_published");
        assert_eq!(body["message"], "Homepage version 3 is published and can no longer be edited");
    }

    #[tokio::test]
    async fn test_server_errors_hide_the_cause() {
        let (status, body) = body_json(DbErr::Custom("disk I/O error".into()).into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "database_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_invalid_credentials_kind() {
        let err: ApiError = AuthError::InvalidCredentials.into();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.kind(), "invalid_credentials");
    }

    #[test]
    fn test_too_short_password_is_bad_request() {
        let err: ApiError = PasswordError::TooShort.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "weak_password");
    }
}
