//! Business logic services for Sathi

pub mod analytics;
pub mod assistant;
pub mod calendar;
pub mod risk_engine;

pub use analytics::{AnalyticsService, CohortSummary};
pub use assistant::{AssistantService, GeminiClient};
pub use calendar::{CalendarEvent, CalendarService};
pub use risk_engine::RiskEngine;
