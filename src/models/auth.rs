//! Authentication models for Sathi

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Roles carried in access tokens
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserRole::Student),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

// ============================================================================
// Request/Response DTOs
// ============================================================================

/// Student login: the student ID must match the email on record
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentLoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, max = 128))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Public identity returned alongside a student token
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub name: String,
    pub student_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudentLoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
}
