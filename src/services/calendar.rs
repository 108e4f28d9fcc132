//! Simulated calendar integration
//!
//! Produces Meet links and focus-block events without calling any external
//! calendar API.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

const FOCUS_BLOCK_SUMMARY: &str = "Deep Focus Block";
const CALENDAR_HTML_LINK: &str = "https://calendar.google.com/calendar/";

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    pub date_time: String,
}

/// Calendar event in the shape the client expects
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
    pub status: String,
    pub html_link: String,
}

#[derive(Debug, Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Counseling link unique per call
    pub fn create_meet_link(&self, student_name: &str) -> String {
        let id = Uuid::new_v4().to_string();
        let meet_id = id.split('-').next().unwrap_or(id.as_str());
        let slug = student_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();

        tracing::info!(student = %student_name, "Simulated Meet link created");

        format!("https://meet.google.com/lookup/{}-{}", meet_id, slug)
    }

    pub fn schedule_focus_block(
        &self,
        student_email: &str,
        start: DateTime<Utc>,
        duration_minutes: i64,
    ) -> CalendarEvent {
        let end = start + Duration::minutes(duration_minutes);

        tracing::info!(
            email = %student_email,
            start = %start.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_minutes,
            "Simulated focus block created"
        );

        CalendarEvent {
            id: Uuid::new_v4().to_string(),
            summary: FOCUS_BLOCK_SUMMARY.to_string(),
            start: EventTime {
                date_time: start.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            end: EventTime {
                date_time: end.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            status: "confirmed".to_string(),
            html_link: CALENDAR_HTML_LINK.to_string(),
        }
    }
}
