//! Cohort analytics for the admin dashboard

use serde::Serialize;

use crate::models::StudentWithRisk;
use crate::services::risk_engine::{GradeTrend, RiskLevel};

/// Headline figures over a set of assessed students
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CohortSummary {
    pub total_students: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
    pub low_risk: usize,
    /// Rounded mean risk score, 0 for an empty cohort
    pub average_risk_score: u32,
    pub declining_grades: usize,
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub fn cohort_summary(students: &[StudentWithRisk]) -> CohortSummary {
        let count_level = |level: RiskLevel| students.iter().filter(|s| s.risk_level == level).count();

        let average_risk_score = if students.is_empty() {
            0
        } else {
            let total: u32 = students.iter().map(|s| s.risk_score as u32).sum();
            (total as f64 / students.len() as f64).round() as u32
        };

        CohortSummary {
            total_students: students.len(),
            high_risk: count_level(RiskLevel::High),
            medium_risk: count_level(RiskLevel::Medium),
            low_risk: count_level(RiskLevel::Low),
            average_risk_score,
            declining_grades: students
                .iter()
                .filter(|s| s.grade_trend == GradeTrend::Declining)
                .count(),
        }
    }
}
