//! Student HTTP handlers
//!
//! Risk is recomputed from the stored record on every read; nothing derived
//! is cached.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AdminUser, StudentUser};
use crate::error::{ApiError, ApiResult};
use crate::models::{Assignment, Student, StudentWithRisk};
use crate::state::AppState;

/// Request body for an assignment submission
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssignmentRequest {
    #[validate(length(min = 1, max = 64))]
    pub assignment_id: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitAssignmentResponse {
    pub message: String,
    pub assignment: Assignment,
}

/// Score a student and attach the result
pub(crate) fn with_risk(state: &AppState, student: Student) -> ApiResult<StudentWithRisk> {
    let assessment = state.risk_engine.assess(&student)?;
    Ok(StudentWithRisk::new(student, assessment))
}

/// Score every stored student, skipping records the engine rejects
pub(crate) fn all_with_risk(state: &AppState) -> Vec<StudentWithRisk> {
    state
        .repository
        .get_all()
        .into_iter()
        .filter_map(|student| {
            let student_id = student.student_id.clone();
            match with_risk(state, student) {
                Ok(scored) => Some(scored),
                Err(e) => {
                    tracing::warn!(student_id = %student_id, error = %e, "Skipping student");
                    None
                }
            }
        })
        .collect()
}

/// GET /api/students - All students with risk (admin)
pub async fn list_students(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Json<Vec<StudentWithRisk>> {
    Json(all_with_risk(&state))
}

/// GET /api/students/:id - One student with risk (admin)
pub async fn get_student(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> ApiResult<Json<StudentWithRisk>> {
    let student = state
        .repository
        .get_by_id(&student_id)
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(with_risk(&state, student)?))
}

/// GET /api/student/me - The caller's own record with risk
pub async fn get_me(
    user: StudentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<StudentWithRisk>> {
    let student = state
        .repository
        .get_by_id(user.student_id())
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(with_risk(&state, student)?))
}

/// POST /api/student/assignments - Submit an outstanding assignment today
pub async fn submit_assignment(
    user: StudentUser,
    State(state): State<AppState>,
    Json(req): Json<SubmitAssignmentRequest>,
) -> ApiResult<Json<SubmitAssignmentResponse>> {
    req.validate()?;

    let assignment = state.repository.record_submission(
        user.student_id(),
        &req.assignment_id,
        Utc::now().date_naive(),
    )?;

    Ok(Json(SubmitAssignmentResponse {
        message: "Assignment submitted successfully".to_string(),
        assignment,
    }))
}
