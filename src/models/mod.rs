//! Data models for the Sathi backend

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::risk_engine::{GradeTrend, RiskAssessment, RiskLevel};

pub mod auth;
pub use auth::*;

/// One day of platform activity for a student
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub date: NaiveDate,
    pub login_count: u32,
    pub video_watch_minutes: u32,
    pub forum_posts: u32,
}

impl ActivityLog {
    /// Daily engagement value: watch minutes plus ten per forum post
    pub fn engagement(&self) -> f64 {
        self.video_watch_minutes as f64 + self.forum_posts as f64 * 10.0
    }
}

/// Assignment with its submission state
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub due_date: NaiveDate,
    /// `None` means not yet submitted
    pub submitted_date: Option<NaiveDate>,
    pub grade: Option<u8>,
}

impl Assignment {
    /// Missing, or handed in after the due date
    pub fn is_late_or_missing(&self) -> bool {
        match self.submitted_date {
            None => true,
            Some(submitted) => submitted > self.due_date,
        }
    }
}

/// Student record as held by the repository
///
/// `assignments` must be ordered oldest-to-newest: the submission latency
/// check looks at the last three entries by position, not by due date.
/// `grades` is a coarse historical series kept apart from assignment grades.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub activity_logs: Vec<ActivityLog>,
    pub assignments: Vec<Assignment>,
    pub grades: Vec<u8>,
}

impl Student {
    /// Rounded mean of the historical grades, 0 when there are none
    pub fn average_grade(&self) -> u32 {
        if self.grades.is_empty() {
            return 0;
        }
        let total: u32 = self.grades.iter().map(|g| *g as u32).sum();
        (total as f64 / self.grades.len() as f64).round() as u32
    }

    /// Most recent activity log date
    pub fn last_activity(&self) -> Option<NaiveDate> {
        self.activity_logs.iter().map(|log| log.date).max()
    }
}

/// Student merged with a freshly computed risk profile
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithRisk {
    #[serde(flatten)]
    pub student: Student,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub red_flags: Vec<String>,
    pub engagement_score: u8,
    pub grade_trend: GradeTrend,
}

impl StudentWithRisk {
    pub fn new(student: Student, assessment: RiskAssessment) -> Self {
        Self {
            student,
            risk_score: assessment.profile.risk_score,
            risk_level: assessment.profile.risk_level,
            red_flags: assessment.profile.red_flags,
            engagement_score: assessment.insights.engagement_score,
            grade_trend: assessment.insights.grade_trend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assignment(submitted: Option<NaiveDate>) -> Assignment {
        Assignment {
            id: "a-1".to_string(),
            title: "Assignment 1".to_string(),
            due_date: date(2025, 3, 10),
            submitted_date: submitted,
            grade: None,
        }
    }

    #[test]
    fn test_late_or_missing() {
        assert!(assignment(None).is_late_or_missing());
        assert!(assignment(Some(date(2025, 3, 11))).is_late_or_missing());
        assert!(!assignment(Some(date(2025, 3, 10))).is_late_or_missing());
        assert!(!assignment(Some(date(2025, 3, 8))).is_late_or_missing());
    }

    #[test]
    fn test_activity_engagement() {
        let log = ActivityLog {
            date: date(2025, 3, 1),
            login_count: 2,
            video_watch_minutes: 45,
            forum_posts: 3,
        };
        assert_eq!(log.engagement(), 75.0);
    }

    #[test]
    fn test_average_grade_and_last_activity() {
        let mut student = Student {
            student_id: "S2024001".to_string(),
            name: "Aarav Patel".to_string(),
            email: "aarav.patel@university.edu".to_string(),
            activity_logs: vec![],
            assignments: vec![],
            grades: vec![],
        };
        assert_eq!(student.average_grade(), 0);
        assert_eq!(student.last_activity(), None);

        student.grades = vec![80, 85, 91];
        assert_eq!(student.average_grade(), 85);

        for day in [3, 9, 5] {
            student.activity_logs.push(ActivityLog {
                date: date(2025, 3, day),
                login_count: 1,
                video_watch_minutes: 0,
                forum_posts: 0,
            });
        }
        assert_eq!(student.last_activity(), Some(date(2025, 3, 9)));
    }

    #[test]
    fn test_student_json_uses_camel_case() {
        let student = Student {
            student_id: "S2024001".to_string(),
            name: "Aarav Patel".to_string(),
            email: "aarav.patel@university.edu".to_string(),
            activity_logs: vec![ActivityLog {
                date: date(2025, 3, 1),
                login_count: 2,
                video_watch_minutes: 30,
                forum_posts: 0,
            }],
            assignments: vec![assignment(None)],
            grades: vec![90],
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["studentId"], "S2024001");
        assert_eq!(json["activityLogs"][0]["loginCount"], 2);
        assert_eq!(json["activityLogs"][0]["date"], "2025-03-01");
        assert!(json["assignments"][0]["submittedDate"].is_null());
    }
}
