//! Authentication extractors
//!
//! `AuthenticatedUser` verifies the Bearer token; `StudentUser` and
//! `AdminUser` additionally pin the role carried in it.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde_json::json;
use std::sync::Arc;

use crate::auth::{verify_token, AuthService, JwtError};
use crate::models::UserRole;

/// Caller identity taken from a verified token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Student ID, or the admin username
    pub subject: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub jti: String,
}

/// Why a request was turned away before reaching its handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    TokenExpired,
    InvalidToken,
    WrongRole(UserRole),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "MISSING_TOKEN",
                "Authorization header with Bearer token required",
            ),
            AuthRejection::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token has expired")
            }
            AuthRejection::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "Invalid token")
            }
            AuthRejection::WrongRole(UserRole::Student) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Student access required")
            }
            AuthRejection::WrongRole(UserRole::Admin) => {
                (StatusCode::FORBIDDEN, "FORBIDDEN", "Admin access required")
            }
        };

        (status, Json(json!({ "error": { "code": code, "message": message } }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AuthRejection::MissingToken)?;

        let auth_service = Arc::<AuthService>::from_ref(state);
        let claims = verify_token(bearer.token(), auth_service.jwt_secret()).map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            match e {
                JwtError::TokenExpired => AuthRejection::TokenExpired,
                _ => AuthRejection::InvalidToken,
            }
        })?;
        let role = claims.role().map_err(|_| AuthRejection::InvalidToken)?;

        Ok(AuthenticatedUser {
            subject: claims.sub,
            name: claims.name,
            role,
            jti: claims.jti,
        })
    }
}

async fn require_role<S>(
    parts: &mut Parts,
    state: &S,
    role: UserRole,
) -> Result<AuthenticatedUser, AuthRejection>
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    let user = AuthenticatedUser::from_request_parts(parts, state).await?;
    if user.role != role {
        return Err(AuthRejection::WrongRole(role));
    }
    Ok(user)
}

/// Student token holder; the subject is the student ID
pub struct StudentUser(pub AuthenticatedUser);

impl StudentUser {
    pub fn student_id(&self) -> &str {
        &self.0.subject
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for StudentUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::Student).await.map(StudentUser)
    }
}

pub struct AdminUser(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        require_role(parts, state, UserRole::Admin).await.map(AdminUser)
    }
}
