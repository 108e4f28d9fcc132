//! Liveness endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

pub async fn root() -> &'static str {
    "Sathi API Server"
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub students: usize,
    pub version: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        students: state.repository.count(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
