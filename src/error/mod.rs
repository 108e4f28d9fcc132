//! API error type
//!
//! Every handler failure becomes a status code plus a JSON body of the form
//! `{"error": {"code": "...", "message": "..."}}`. Auth extractors and the
//! rate limiter emit the same shape themselves.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use crate::repository::RepositoryError;
use crate::services::risk_engine::RiskError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Conflict(String),

    /// Stored record the risk engine refused to score
    #[error("{0}")]
    UnscorableRecord(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetails<'a>,
}

#[derive(Serialize)]
struct ErrorDetails<'a> {
    code: &'static str,
    message: &'a str,
}

impl ApiError {
    /// Status and machine-readable code for this error
    pub fn parts(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            ApiError::UnscorableRecord(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNSCORABLE_RECORD")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.parts().0
    }

    pub fn error_code(&self) -> &'static str {
        self.parts().1
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.parts();

        // Internal details stay in the log
        let message = match &self {
            ApiError::Internal(_) => {
                tracing::error!(error = %self, code, "Request failed");
                "Internal server error".to_string()
            }
            _ => {
                tracing::debug!(error = %self, code, "Request rejected");
                self.to_string()
            }
        };

        let body = ErrorBody {
            error: ErrorDetails {
                code,
                message: &message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<RiskError> for ApiError {
    fn from(err: RiskError) -> Self {
        ApiError::UnscorableRecord(err.to_string())
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::StudentNotFound(_) | RepositoryError::AssignmentNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            RepositoryError::AlreadySubmitted(_) => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidAdminCredentials => {
                ApiError::Unauthorized(err.to_string())
            }
            AuthError::Token(_) | AuthError::PasswordHash(_) => ApiError::Internal(err.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_domain_errors_map_to_status() {
        let err: ApiError = RiskError::InvalidStudentData("grade 140".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ApiError = RepositoryError::AlreadySubmitted("a-1".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let err: ApiError = RepositoryError::AssignmentNotFound("a-9".to_string()).into();
        assert_eq!(err.error_code(), "NOT_FOUND");

        let err: ApiError = AuthError::InvalidAdminCredentials.into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err: ApiError = AuthError::PasswordHash("bad hash".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let response = ApiError::Internal("bcrypt cost mismatch".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::NotFound("Student not found".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "Student not found");
    }
}
