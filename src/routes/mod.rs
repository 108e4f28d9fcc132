//! Route definitions for the Sathi API

mod analytics;
mod auth;
mod calendar;
mod chat;
mod students;

pub use analytics::analytics_routes;
pub use auth::auth_routes;
pub use calendar::calendar_routes;
pub use chat::chat_routes;
pub use students::student_routes;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::handlers::{health_check, root};
use crate::middleware::{self, RateLimiter};
use crate::state::AppState;

/// Full application router with the middleware stack applied
pub fn create_router(
    state: AppState,
    rate_limiter: RateLimiter,
    cors_allowed_origins: Option<&str>,
) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(auth_routes())
        .merge(student_routes())
        .merge(chat_routes())
        .merge(calendar_routes())
        .merge(analytics_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::security_headers))
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(axum::middleware::from_fn_with_state(
            rate_limiter,
            middleware::rate_limit,
        ))
        .layer(configure_cors(cors_allowed_origins))
}

/// Permissive when no origins are configured
pub fn configure_cors(allowed_origins: Option<&str>) -> CorsLayer {
    let allowed_origins = allowed_origins.unwrap_or_default().trim();

    if allowed_origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing all origins (permissive)");
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
