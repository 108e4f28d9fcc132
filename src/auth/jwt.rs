//! JWT token generation and validation
//!
//! Handles creation and verification of access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::UserRole;

/// JWT-related errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Token decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims for access tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (student ID, or the admin username)
    pub sub: String,
    /// Display name, students only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// "student" or "admin"
    pub role: String,
    /// JWT ID
    pub jti: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn role(&self) -> Result<UserRole, JwtError> {
        UserRole::parse(&self.role)
            .ok_or_else(|| JwtError::InvalidToken(format!("unknown role '{}'", self.role)))
    }
}

/// Generate an access token
///
/// # Arguments
/// * `subject` - Student ID or admin username
/// * `name` - Display name carried for students
/// * `role` - Role granted by the token
/// * `jti` - Unique token identifier
/// * `secret` - JWT signing secret
/// * `ttl_seconds` - Token time-to-live in seconds
pub fn generate_access_token(
    subject: &str,
    name: Option<&str>,
    role: UserRole,
    jti: &str,
    secret: &str,
    ttl_seconds: i64,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let exp = now + Duration::seconds(ttl_seconds);

    let claims = Claims {
        sub: subject.to_string(),
        name: name.map(str::to_string),
        role: role.as_str().to_string(),
        jti: jti.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::EncodingFailed(e.to_string()))
}

/// Verify and decode a JWT token
///
/// # Returns
/// * `Ok(Claims)` if token is valid
/// * `Err(JwtError)` if validation fails
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        _ => JwtError::DecodingFailed(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_generate_student_token() {
        let jti = Uuid::new_v4().to_string();
        let secret = "test-secret-key";

        let token = generate_access_token(
            "S2024001",
            Some("Aarav Patel"),
            UserRole::Student,
            &jti,
            secret,
            900,
        )
        .unwrap();
        assert!(!token.is_empty());

        let claims = verify_token(&token, secret).unwrap();
        assert_eq!(claims.sub, "S2024001");
        assert_eq!(claims.name.as_deref(), Some("Aarav Patel"));
        assert_eq!(claims.role().unwrap(), UserRole::Student);
        assert_eq!(claims.jti, jti);
    }

    #[test]
    fn test_admin_token_has_no_name() {
        let token =
            generate_access_token("admin", None, UserRole::Admin, "jti-1", "secret", 900).unwrap();
        let claims = verify_token(&token, "secret").unwrap();
        assert_eq!(claims.role().unwrap(), UserRole::Admin);
        assert!(claims.name.is_none());
    }

    #[test]
    fn test_expired_token() {
        let token =
            generate_access_token("S2024001", None, UserRole::Student, "jti", "secret", -60)
                .unwrap();
        assert!(matches!(
            verify_token(&token, "secret"),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let result = verify_token("invalid.token.here", "test-secret-key");
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let token =
            generate_access_token("S2024001", None, UserRole::Student, "jti", "secret1", 900)
                .unwrap();
        let result = verify_token(&token, "secret2");
        assert!(result.is_err());
    }
}
