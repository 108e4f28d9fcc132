//! Burnout Risk Assessment Engine for Sathi
//!
//! Scores a student's recent trajectory from activity logs, assignment
//! submissions and historical grades. Every call is a pure function of the
//! student record: nothing is cached and the input is never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::models::{ActivityLog, Assignment, Student};

// ============================================================================
// Configuration Constants
// ============================================================================

/// Weight of the login decay sub-score
const WEIGHT_LOGIN_DECAY: f64 = 0.30;

/// Weight of the submission latency sub-score
const WEIGHT_SUBMISSION_LATENCY: f64 = 0.25;

/// Weight of the engagement decay sub-score
const WEIGHT_ENGAGEMENT_DECAY: f64 = 0.25;

/// Weight of the grade trend sub-score
const WEIGHT_GRADE_TREND: f64 = 0.20;

/// Baseline activity average when the older window is empty
const ACTIVITY_BASELINE_FALLBACK: f64 = 1.0;

/// Current activity average when the newer window is empty
const ACTIVITY_CURRENT_FALLBACK: f64 = 0.0;

/// Grade average used for either half when it is empty
const GRADE_FALLBACK: f64 = 100.0;

/// Number of trailing assignments checked for latency
const RECENT_ASSIGNMENTS: usize = 3;

/// A 20% grade decline saturates the grade sub-score
const GRADE_DROP_MULTIPLIER: f64 = 5.0;

const LOGIN_DROP_THRESHOLD: f64 = 0.5;
const LATENCY_THRESHOLD: f64 = 0.3;
const ENGAGEMENT_DROP_THRESHOLD: f64 = 0.5;
const GRADE_DROP_THRESHOLD: f64 = 0.1;

/// Relative grade movement needed before a trend is reported
const GRADE_TREND_THRESHOLD: f64 = 0.05;

const MAX_RED_FLAGS: usize = 2;
const MAX_RISK_SCORE: f64 = 100.0;
const MAX_GRADE: u8 = 100;

pub const FLAG_LOGIN_DROP: &str = "Significant drop in login frequency";
pub const FLAG_LATE_ASSIGNMENTS: &str = "Recent missed or late assignments";
pub const FLAG_ENGAGEMENT_DROP: &str = "Drastic decline in engagement";
pub const FLAG_GRADE_DECLINE: &str = "Declining academic performance";

// ============================================================================
// Data Models
// ============================================================================

/// Discretized risk bucket
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Inclusive lower bounds: 70 and up is HIGH, 40 and up is MEDIUM
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => RiskLevel::High,
            40..=69 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

/// Direction of the historical grade series
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum GradeTrend {
    Improving,
    Stable,
    Declining,
}

/// Engine output, recomputed on every read
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    /// Composite score, 0-100
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    /// At most two, in login, latency, engagement, grade order
    pub red_flags: Vec<String>,
}

/// Weighted partial contributions, in score points
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub login: f64,
    pub latency: f64,
    pub engagement: f64,
    pub grade: f64,
}

impl SubScores {
    pub fn total(&self) -> f64 {
        self.login + self.latency + self.engagement + self.grade
    }
}

/// Dashboard figures derived from the same windows as the score
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// 100 means no engagement decline between windows
    pub engagement_score: u8,
    pub grade_trend: GradeTrend,
}

/// Full result of one assessment
#[derive(Debug, Clone)]
pub struct RiskAssessment {
    pub profile: RiskProfile,
    pub sub_scores: SubScores,
    pub insights: Insights,
}

/// Rejections raised only in strict mode
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RiskError {
    #[error("Invalid student data: {0}")]
    InvalidStudentData(String),
}

/// Outcome of a single sub-score calculator
#[derive(Debug, Clone, Copy)]
struct SubScore {
    points: f64,
    flag: Option<&'static str>,
}

// ============================================================================
// Risk Engine Service
// ============================================================================

/// Risk assessment engine
///
/// Stateless apart from the validation switch, so a single instance is
/// shared across all handlers.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    strict: bool,
}

impl RiskEngine {
    /// Permissive engine: malformed input is scored as-is
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// Engine that rejects out-of-range grades and duplicate log dates
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Assess a student, validating first when strict
    pub fn assess(&self, student: &Student) -> Result<RiskAssessment, RiskError> {
        if self.strict {
            validate_student(student)?;
        }

        let assessment = assess_student(student);

        tracing::debug!(
            student_id = %student.student_id,
            risk_score = assessment.profile.risk_score,
            risk_level = assessment.profile.risk_level.as_str(),
            "Risk assessed"
        );

        Ok(assessment)
    }
}

/// Permissive scoring entry point; never fails
pub fn calculate_risk(student: &Student) -> RiskProfile {
    assess_student(student).profile
}

/// Reject data the scoring formulas would silently misread
pub fn validate_student(student: &Student) -> Result<(), RiskError> {
    if let Some(grade) = student.grades.iter().find(|g| **g > MAX_GRADE) {
        return Err(RiskError::InvalidStudentData(format!(
            "historical grade {} is above {}",
            grade, MAX_GRADE
        )));
    }

    for assignment in &student.assignments {
        if let Some(grade) = assignment.grade.filter(|g| *g > MAX_GRADE) {
            return Err(RiskError::InvalidStudentData(format!(
                "assignment {} has grade {} above {}",
                assignment.id, grade, MAX_GRADE
            )));
        }
    }

    let mut seen = HashSet::new();
    for log in &student.activity_logs {
        if !seen.insert(log.date) {
            return Err(RiskError::InvalidStudentData(format!(
                "duplicate activity log for {}",
                log.date
            )));
        }
    }

    Ok(())
}

fn assess_student(student: &Student) -> RiskAssessment {
    let (old_logs, new_logs) = split_activity_window(&student.activity_logs);
    let (old_grades, new_grades) = split_half(&student.grades);

    let login_drop = login_decline(&old_logs, &new_logs);
    let engagement_drop = engagement_decline(&old_logs, &new_logs);
    let avg_grade_old = mean(old_grades.iter().map(|g| *g as f64)).unwrap_or(GRADE_FALLBACK);
    let avg_grade_new = mean(new_grades.iter().map(|g| *g as f64)).unwrap_or(GRADE_FALLBACK);
    let grade_drop = relative_drop(avg_grade_old, avg_grade_new, GRADE_FALLBACK);

    let calculators = [
        login_sub_score(login_drop),
        latency_sub_score(&student.assignments),
        engagement_sub_score(engagement_drop),
        grade_sub_score(grade_drop),
    ];

    let sub_scores = SubScores {
        login: calculators[0].points,
        latency: calculators[1].points,
        engagement: calculators[2].points,
        grade: calculators[3].points,
    };

    let risk_score = sub_scores.total().min(MAX_RISK_SCORE).round() as u8;

    let red_flags = calculators
        .iter()
        .filter_map(|c| c.flag)
        .take(MAX_RED_FLAGS)
        .map(str::to_string)
        .collect();

    let insights = Insights {
        engagement_score: ((1.0 - engagement_drop) * 100.0).round().clamp(0.0, 100.0) as u8,
        grade_trend: grade_trend(avg_grade_old, avg_grade_new, grade_drop),
    };

    RiskAssessment {
        profile: RiskProfile {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            red_flags,
        },
        sub_scores,
        insights,
    }
}

// ============================================================================
// Window Splitter
// ============================================================================

/// Sort logs by date and split at `floor(n/2)`; an odd extra goes to the newer half
pub fn split_activity_window(logs: &[ActivityLog]) -> (Vec<&ActivityLog>, Vec<&ActivityLog>) {
    let mut ordered: Vec<&ActivityLog> = logs.iter().collect();
    ordered.sort_by_key(|log| log.date);
    let newer = ordered.split_off(ordered.len() / 2);
    (ordered, newer)
}

/// Positional midpoint split, no re-sorting
fn split_half<T>(values: &[T]) -> (&[T], &[T]) {
    values.split_at(values.len() / 2)
}

// ============================================================================
// Sub-score Calculators
// ============================================================================

fn login_decline(old_logs: &[&ActivityLog], new_logs: &[&ActivityLog]) -> f64 {
    activity_decline(old_logs, new_logs, |log| log.login_count as f64)
}

fn engagement_decline(old_logs: &[&ActivityLog], new_logs: &[&ActivityLog]) -> f64 {
    activity_decline(old_logs, new_logs, ActivityLog::engagement)
}

/// Decline between the two activity windows; no observations means no decline
fn activity_decline(
    old_logs: &[&ActivityLog],
    new_logs: &[&ActivityLog],
    value: impl Fn(&ActivityLog) -> f64,
) -> f64 {
    if old_logs.is_empty() && new_logs.is_empty() {
        return 0.0;
    }

    let avg_old =
        mean(old_logs.iter().map(|log| value(*log))).unwrap_or(ACTIVITY_BASELINE_FALLBACK);
    let avg_new =
        mean(new_logs.iter().map(|log| value(*log))).unwrap_or(ACTIVITY_CURRENT_FALLBACK);

    relative_drop(avg_old, avg_new, ACTIVITY_BASELINE_FALLBACK)
}

fn login_sub_score(login_drop: f64) -> SubScore {
    SubScore {
        points: login_drop * 100.0 * WEIGHT_LOGIN_DECAY,
        flag: (login_drop > LOGIN_DROP_THRESHOLD).then_some(FLAG_LOGIN_DROP),
    }
}

/// Counts the trailing three assignments by position; fewer still divide by three
fn latency_sub_score(assignments: &[Assignment]) -> SubScore {
    let late_or_missing = assignments
        .iter()
        .rev()
        .take(RECENT_ASSIGNMENTS)
        .filter(|a| a.is_late_or_missing())
        .count();

    let latency_fraction = late_or_missing as f64 / RECENT_ASSIGNMENTS as f64;

    SubScore {
        points: latency_fraction * 100.0 * WEIGHT_SUBMISSION_LATENCY,
        flag: (latency_fraction > LATENCY_THRESHOLD).then_some(FLAG_LATE_ASSIGNMENTS),
    }
}

fn engagement_sub_score(engagement_drop: f64) -> SubScore {
    SubScore {
        points: engagement_drop * 100.0 * WEIGHT_ENGAGEMENT_DECAY,
        flag: (engagement_drop > ENGAGEMENT_DROP_THRESHOLD).then_some(FLAG_ENGAGEMENT_DROP),
    }
}

fn grade_sub_score(grade_drop: f64) -> SubScore {
    SubScore {
        points: (grade_drop * GRADE_DROP_MULTIPLIER).min(1.0) * 100.0 * WEIGHT_GRADE_TREND,
        flag: (grade_drop > GRADE_DROP_THRESHOLD).then_some(FLAG_GRADE_DECLINE),
    }
}

/// Direction of the grade series. A zero older average has no relative
/// baseline, so only the sign of the newer average counts.
fn grade_trend(avg_old: f64, avg_new: f64, grade_drop: f64) -> GradeTrend {
    if avg_old <= 0.0 {
        return if avg_new > 0.0 {
            GradeTrend::Improving
        } else {
            GradeTrend::Stable
        };
    }

    if grade_drop > GRADE_TREND_THRESHOLD {
        GradeTrend::Declining
    } else if (avg_new - avg_old) / avg_old > GRADE_TREND_THRESHOLD {
        GradeTrend::Improving
    } else {
        GradeTrend::Stable
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Floor-at-zero relative decline. A zero baseline is replaced by `fallback`.
fn relative_drop(baseline: f64, current: f64, fallback: f64) -> f64 {
    let baseline = if baseline > 0.0 { baseline } else { fallback };
    ((baseline - current) / baseline).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn log(day: u32, logins: u32, minutes: u32, posts: u32) -> ActivityLog {
        ActivityLog {
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            login_count: logins,
            video_watch_minutes: minutes,
            forum_posts: posts,
        }
    }

    #[test]
    fn test_split_sorts_and_puts_odd_extra_in_newer_half() {
        let logs = vec![log(5, 5, 0, 0), log(1, 1, 0, 0), log(3, 3, 0, 0)];
        let (old, new) = split_activity_window(&logs);
        assert_eq!(old.len(), 1);
        assert_eq!(new.len(), 2);
        assert_eq!(old[0].login_count, 1);
        assert_eq!(new[0].login_count, 3);
        assert_eq!(new[1].login_count, 5);
    }

    #[test]
    fn test_split_empty() {
        let (old, new) = split_activity_window(&[]);
        assert!(old.is_empty());
        assert!(new.is_empty());
    }

    #[test]
    fn test_split_half_keeps_order() {
        let grades = [90u8, 40, 70, 60, 80];
        let (old, new) = split_half(&grades);
        assert_eq!(old, &[90, 40]);
        assert_eq!(new, &[70, 60, 80]);
    }

    #[test]
    fn test_relative_drop_floors_at_zero() {
        assert_eq!(relative_drop(4.0, 6.0, 1.0), 0.0);
        assert_eq!(relative_drop(4.0, 0.0, 1.0), 1.0);
        assert_eq!(relative_drop(4.0, 3.0, 1.0), 0.25);
    }

    #[test]
    fn test_zero_baseline_uses_fallback() {
        assert_eq!(relative_drop(0.0, 0.0, 1.0), 1.0);
        assert_eq!(relative_drop(0.0, 2.0, 1.0), 0.0);
    }

    #[test]
    fn test_single_log_uses_baseline_fallback() {
        // One log lands in the newer half; the older half falls back to 1.
        let logs = vec![log(1, 0, 0, 0)];
        let (old, new) = split_activity_window(&logs);
        assert_eq!(login_decline(&old, &new), 1.0);

        let logs = vec![log(1, 3, 0, 0)];
        let (old, new) = split_activity_window(&logs);
        assert_eq!(login_decline(&old, &new), 0.0);
    }

    #[test]
    fn test_engagement_counts_forum_posts_tenfold() {
        let logs = vec![log(1, 0, 0, 2), log(2, 0, 5, 0)];
        let (old, new) = split_activity_window(&logs);
        assert_eq!(engagement_decline(&old, &new), 0.75);
    }

    #[test]
    fn test_grade_sub_score_saturates() {
        let sub = grade_sub_score(0.25);
        assert!((sub.points - 20.0).abs() < 1e-9);
        assert_eq!(sub.flag, Some(FLAG_GRADE_DECLINE));

        let sub = grade_sub_score(0.1);
        assert!((sub.points - 10.0).abs() < 1e-9);
        assert_eq!(sub.flag, None);
    }

    #[test]
    fn test_risk_level_boundaries() {
        assert_eq!(RiskLevel::from_score(0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(39), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(40), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(70), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100), RiskLevel::High);
    }

    #[test]
    fn test_grade_trend() {
        assert_eq!(grade_trend(80.0, 70.0, 0.125), GradeTrend::Declining);
        assert_eq!(grade_trend(80.0, 78.0, 0.025), GradeTrend::Stable);
        assert_eq!(grade_trend(80.0, 90.0, 0.0), GradeTrend::Improving);
    }

    #[test]
    fn test_risk_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"MEDIUM\"");
    }
}
