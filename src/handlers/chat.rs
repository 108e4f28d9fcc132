//! Chat assistant handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::StudentUser;
use crate::error::{ApiError, ApiResult};
use crate::services::assistant::student_context;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat/message - Ask the assistant, grounded in the caller's record
pub async fn send_message(
    user: StudentUser,
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    req.validate()?;

    let student = state
        .repository
        .get_by_id(user.student_id())
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let assessment = state.risk_engine.assess(&student)?;
    let context = student_context(&student, &assessment);

    let reply = state.assistant.reply(&req.message, Some(&context)).await;

    Ok(Json(ChatResponse { reply }))
}
