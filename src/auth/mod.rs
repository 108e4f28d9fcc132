//! Authentication module for Sathi
//!
//! - Student login by matching student ID and email on record
//! - Admin login against a bcrypt password hash
//! - JWT access token generation and validation

mod jwt;
mod service;

pub use jwt::{generate_access_token, verify_token, Claims, JwtError};
pub use service::{hash_password, AuthError, AuthService};
