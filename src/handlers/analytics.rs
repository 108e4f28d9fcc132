//! Cohort analytics handler

use axum::{extract::State, Json};

use super::{students::all_with_risk, AdminUser};
use crate::services::{AnalyticsService, CohortSummary};
use crate::state::AppState;

/// GET /api/analytics - Risk distribution across all students (admin)
pub async fn get_cohort_analytics(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Json<CohortSummary> {
    let students = all_with_risk(&state);
    Json(AnalyticsService::cohort_summary(&students))
}
