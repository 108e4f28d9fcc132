//! Student repository
//!
//! Handlers receive the repository through `AppState`; the process bootstrap
//! decides what backs it. The only backing today is in-memory synthetic data.

mod generator;

use chrono::NaiveDate;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

use crate::models::{Assignment, Student};

pub use generator::{
    generate_students, SyntheticProfile, DEMO_STUDENT_EMAIL, DEMO_STUDENT_ID, DEMO_STUDENT_NAME,
};

/// Repository errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Assignment not found: {0}")]
    AssignmentNotFound(String),

    #[error("Assignment already submitted: {0}")]
    AlreadySubmitted(String),
}

/// Read access to students plus the one permitted write, recording a submission
pub trait StudentRepository: Send + Sync {
    fn get_all(&self) -> Vec<Student>;

    fn get_by_id(&self, student_id: &str) -> Option<Student>;

    fn get_by_email(&self, email: &str) -> Option<Student>;

    /// Mark an outstanding assignment as submitted on `submitted_on`
    fn record_submission(
        &self,
        student_id: &str,
        assignment_id: &str,
        submitted_on: NaiveDate,
    ) -> Result<Assignment, RepositoryError>;

    fn count(&self) -> usize {
        self.get_all().len()
    }
}

/// Process-local store, populated once at startup
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    students: RwLock<Vec<Student>>,
}

impl InMemoryStudentRepository {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            students: RwLock::new(students),
        }
    }
}

impl StudentRepository for InMemoryStudentRepository {
    fn get_all(&self) -> Vec<Student> {
        self.students
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn get_by_id(&self, student_id: &str) -> Option<Student> {
        self.students
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.student_id == student_id)
            .cloned()
    }

    fn get_by_email(&self, email: &str) -> Option<Student> {
        self.students
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.email == email)
            .cloned()
    }

    fn record_submission(
        &self,
        student_id: &str,
        assignment_id: &str,
        submitted_on: NaiveDate,
    ) -> Result<Assignment, RepositoryError> {
        let mut students = self.students.write().unwrap_or_else(PoisonError::into_inner);

        let student = students
            .iter_mut()
            .find(|s| s.student_id == student_id)
            .ok_or_else(|| RepositoryError::StudentNotFound(student_id.to_string()))?;

        let assignment = student
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment_id)
            .ok_or_else(|| RepositoryError::AssignmentNotFound(assignment_id.to_string()))?;

        if assignment.submitted_date.is_some() {
            return Err(RepositoryError::AlreadySubmitted(assignment_id.to_string()));
        }

        assignment.submitted_date = Some(submitted_on);

        tracing::info!(
            student_id = %student_id,
            assignment_id = %assignment_id,
            submitted_on = %submitted_on,
            "Assignment submission recorded"
        );

        Ok(assignment.clone())
    }

    fn count(&self) -> usize {
        self.students.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn repository() -> InMemoryStudentRepository {
        InMemoryStudentRepository::new(vec![Student {
            student_id: "S2024002".to_string(),
            name: "Neha Gupta".to_string(),
            email: "neha.gupta@university.edu".to_string(),
            activity_logs: vec![],
            assignments: vec![
                Assignment {
                    id: "a-1".to_string(),
                    title: "Assignment 1".to_string(),
                    due_date: date(1),
                    submitted_date: Some(date(1)),
                    grade: Some(88),
                },
                Assignment {
                    id: "a-2".to_string(),
                    title: "Assignment 2".to_string(),
                    due_date: date(8),
                    submitted_date: None,
                    grade: None,
                },
            ],
            grades: vec![88],
        }])
    }

    #[test]
    fn test_lookups() {
        let repo = repository();
        assert_eq!(repo.count(), 1);
        assert_eq!(repo.get_all().len(), 1);
        assert!(repo.get_by_id("S2024002").is_some());
        assert!(repo.get_by_id("S9999999").is_none());
        assert!(repo.get_by_email("neha.gupta@university.edu").is_some());
        assert!(repo.get_by_email("NEHA.GUPTA@university.edu").is_none());
    }

    #[test]
    fn test_record_submission() {
        let repo = repository();

        let updated = repo.record_submission("S2024002", "a-2", date(10)).unwrap();
        assert_eq!(updated.submitted_date, Some(date(10)));
        assert!(updated.is_late_or_missing());

        let stored = repo.get_by_id("S2024002").unwrap();
        assert_eq!(stored.assignments[1].submitted_date, Some(date(10)));
    }

    #[test]
    fn test_record_submission_errors() {
        let repo = repository();

        assert_eq!(
            repo.record_submission("S0", "a-2", date(2)),
            Err(RepositoryError::StudentNotFound("S0".to_string()))
        );
        assert_eq!(
            repo.record_submission("S2024002", "missing", date(2)),
            Err(RepositoryError::AssignmentNotFound("missing".to_string()))
        );
        assert_eq!(
            repo.record_submission("S2024002", "a-1", date(2)),
            Err(RepositoryError::AlreadySubmitted("a-1".to_string()))
        );
    }
}
