//! Student routes

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::students;
use crate::state::AppState;

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/api/students", get(students::list_students))
        .route("/api/students/:id", get(students::get_student))
        .route("/api/student/me", get(students::get_me))
        .route("/api/student/assignments", post(students::submit_assignment))
}
