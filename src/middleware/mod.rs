//! Middleware for the Sathi API
//!
//! Request tracing, rate limiting, security headers, and authentication
//! extractors.

pub mod auth;
mod rate_limiter;
mod security;
mod tracing;

pub use auth::{AdminUser, AuthRejection, AuthenticatedUser, StudentUser};
pub use rate_limiter::{rate_limit, RateLimiter};
pub use security::security_headers;
pub use tracing::{request_tracing, REQUEST_ID_HEADER};
