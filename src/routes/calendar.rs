//! Calendar routes

use axum::{routing::post, Router};

use crate::handlers::calendar;
use crate::state::AppState;

pub fn calendar_routes() -> Router<AppState> {
    Router::new()
        .route("/api/calendar/meet", post(calendar::create_meet))
        .route("/api/calendar/focus", post(calendar::schedule_focus))
}
