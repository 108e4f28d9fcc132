//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::AuthService;
use crate::repository::StudentRepository;
use crate::services::{AssistantService, CalendarService, RiskEngine};

use axum::extract::FromRef;

/// Shared application state
///
/// Built once by the process bootstrap; every field is an `Arc` so cloning
/// per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn StudentRepository>,
    pub risk_engine: Arc<RiskEngine>,
    pub auth_service: Arc<AuthService>,
    pub assistant: Arc<AssistantService>,
    pub calendar: Arc<CalendarService>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn StudentRepository>,
        risk_engine: Arc<RiskEngine>,
        auth_service: Arc<AuthService>,
        assistant: Arc<AssistantService>,
        calendar: Arc<CalendarService>,
    ) -> Self {
        Self {
            repository,
            risk_engine,
            auth_service,
            assistant,
            calendar,
        }
    }
}

impl FromRef<AppState> for Arc<dyn StudentRepository> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.repository.clone()
    }
}

impl FromRef<AppState> for Arc<RiskEngine> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.risk_engine.clone()
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<AssistantService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.assistant.clone()
    }
}

impl FromRef<AppState> for Arc<CalendarService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.calendar.clone()
    }
}
