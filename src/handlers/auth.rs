//! Authentication HTTP handlers
//!
//! Student login by ID and email; admin login by username and password.

use axum::{extract::State, Json};
use validator::Validate;

use crate::error::ApiResult;
use crate::models::{AdminLoginRequest, AdminLoginResponse, StudentLoginRequest, StudentLoginResponse};
use crate::state::AppState;

/// POST /api/auth/login - Student login
pub async fn student_login(
    State(state): State<AppState>,
    Json(mut req): Json<StudentLoginRequest>,
) -> ApiResult<Json<StudentLoginResponse>> {
    req.student_id = req.student_id.trim().to_string();
    req.email = req.email.trim().to_string();
    req.validate()?;

    let response = state
        .auth_service
        .login_student(&req.student_id, &req.email)?;

    Ok(Json(response))
}

/// POST /api/auth/admin/login - Admin login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> ApiResult<Json<AdminLoginResponse>> {
    req.validate()?;

    let response = state
        .auth_service
        .login_admin(&req.username, &req.password)
        .await?;

    Ok(Json(response))
}
