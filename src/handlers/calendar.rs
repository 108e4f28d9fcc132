//! Calendar handlers: counseling links and focus blocks

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{AdminUser, StudentUser};
use crate::error::{ApiError, ApiResult};
use crate::services::CalendarEvent;
use crate::state::AppState;

const FOCUS_BLOCK_LEAD_MINUTES: i64 = 10;
const FOCUS_BLOCK_MINUTES: i64 = 45;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MeetRequest {
    #[validate(length(min = 1, max = 64))]
    pub student_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetResponse {
    pub success: bool,
    pub meet_link: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FocusResponse {
    pub success: bool,
    pub event: CalendarEvent,
    pub message: String,
}

/// POST /api/calendar/meet - Create a counseling link for a student (admin)
pub async fn create_meet(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<MeetRequest>,
) -> ApiResult<Json<MeetResponse>> {
    req.validate()?;

    // Unknown IDs still get a link, addressed generically
    let name = state
        .repository
        .get_by_id(&req.student_id)
        .map(|s| s.name)
        .unwrap_or_else(|| "Student".to_string());

    let meet_link = state.calendar.create_meet_link(&name);

    Ok(Json(MeetResponse {
        success: true,
        meet_link,
        message: format!("Counseling session created for {}", name),
    }))
}

/// POST /api/calendar/focus - Book a focus block for the caller
pub async fn schedule_focus(
    user: StudentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<FocusResponse>> {
    let student = state
        .repository
        .get_by_id(user.student_id())
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let start = Utc::now() + Duration::minutes(FOCUS_BLOCK_LEAD_MINUTES);
    let event = state
        .calendar
        .schedule_focus_block(&student.email, start, FOCUS_BLOCK_MINUTES);

    Ok(Json(FocusResponse {
        success: true,
        event,
        message: "Focus block added to your Google Calendar!".to_string(),
    }))
}
