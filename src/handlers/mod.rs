//! API handlers for Sathi

pub mod analytics;
pub mod auth;
pub mod calendar;
pub mod chat;
pub mod health;
pub mod students;

pub use analytics::get_cohort_analytics;
pub use auth::{admin_login, student_login};
pub use calendar::{create_meet, schedule_focus};
pub use chat::send_message;
pub use health::{health_check, root};
pub use students::{get_me, get_student, list_students, submit_assignment};

pub use crate::middleware::auth::{AdminUser, AuthenticatedUser, StudentUser};
