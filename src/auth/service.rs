//! Authentication service
//!
//! Core business logic for student and admin login.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AdminLoginResponse, LoginUser, StudentLoginResponse, UserRole};
use crate::repository::StudentRepository;

use super::jwt::{generate_access_token, JwtError};

/// Auth service errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid admin credentials")]
    InvalidAdminCredentials,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AuthError::PasswordHash(e.to_string())
    }
}

/// Hash a password for the admin account
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn StudentRepository>,
    jwt_secret: String,
    access_token_ttl_seconds: i64,
    admin_username: String,
    admin_password_hash: String,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        repository: Arc<dyn StudentRepository>,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        admin_username: String,
        admin_password_hash: String,
    ) -> Self {
        Self {
            repository,
            jwt_secret,
            access_token_ttl_seconds,
            admin_username,
            admin_password_hash,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// Log a student in; the ID must exist and its email must match exactly
    pub fn login_student(
        &self,
        student_id: &str,
        email: &str,
    ) -> Result<StudentLoginResponse, AuthError> {
        let student = self
            .repository
            .get_by_id(student_id)
            .filter(|s| s.email == email)
            .ok_or_else(|| {
                tracing::warn!(student_id = %student_id, "Student login rejected");
                AuthError::InvalidCredentials
            })?;

        let jti = Uuid::new_v4().to_string();
        let token = generate_access_token(
            &student.student_id,
            Some(&student.name),
            UserRole::Student,
            &jti,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?;

        tracing::info!(student_id = %student.student_id, jti = %jti, "Student logged in");

        Ok(StudentLoginResponse {
            token,
            user: LoginUser {
                name: student.name,
                student_id: student.student_id,
            },
        })
    }

    /// Log the admin in against the configured bcrypt hash
    pub async fn login_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, AuthError> {
        let password = password.to_string();
        let hash = self.admin_password_hash.clone();
        let password_ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))??;

        if username != self.admin_username || !password_ok {
            tracing::warn!(username = %username, "Admin login rejected");
            return Err(AuthError::InvalidAdminCredentials);
        }

        let jti = Uuid::new_v4().to_string();
        let token = generate_access_token(
            &self.admin_username,
            None,
            UserRole::Admin,
            &jti,
            &self.jwt_secret,
            self.access_token_ttl_seconds,
        )?;

        tracing::info!(jti = %jti, "Admin logged in");

        Ok(AdminLoginResponse { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_token;
    use crate::models::Student;
    use crate::repository::InMemoryStudentRepository;

    fn service() -> AuthService {
        let repository = Arc::new(InMemoryStudentRepository::new(vec![Student {
            student_id: "STD2506".to_string(),
            name: "Priyanshu Bakshi".to_string(),
            email: "bakshi@gmail.com".to_string(),
            activity_logs: vec![],
            assignments: vec![],
            grades: vec![],
        }]));
        AuthService::new(
            repository,
            "test-secret".to_string(),
            3600,
            "admin".to_string(),
            hash_password("admin", 4).unwrap(),
        )
    }

    #[test]
    fn test_student_login() {
        let auth = service();
        let response = auth.login_student("STD2506", "bakshi@gmail.com").unwrap();
        assert_eq!(response.user.student_id, "STD2506");
        assert_eq!(response.user.name, "Priyanshu Bakshi");

        let claims = verify_token(&response.token, "test-secret").unwrap();
        assert_eq!(claims.sub, "STD2506");
        assert_eq!(claims.role().unwrap(), UserRole::Student);
    }

    #[test]
    fn test_student_login_rejects_mismatched_email() {
        let auth = service();
        assert!(matches!(
            auth.login_student("STD2506", "someone@else.com"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login_student("S0000000", "bakshi@gmail.com"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_admin_login() {
        let auth = service();
        let response = auth.login_admin("admin", "admin").await.unwrap();
        let claims = verify_token(&response.token, "test-secret").unwrap();
        assert_eq!(claims.role().unwrap(), UserRole::Admin);

        assert!(matches!(
            auth.login_admin("admin", "wrong").await,
            Err(AuthError::InvalidAdminCredentials)
        ));
        assert!(matches!(
            auth.login_admin("root", "admin").await,
            Err(AuthError::InvalidAdminCredentials)
        ));
    }
}
