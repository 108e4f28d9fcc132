//! Synthetic student data
//!
//! Each student is assigned a hidden burnout profile that shapes their grades,
//! activity and submissions. The profile itself is not stored; the risk engine
//! has to rediscover it from the data.

use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Builder;

use crate::models::{ActivityLog, Assignment, Student};

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Vihaan", "Vivaan", "Ananya", "Diya", "Advik", "Kabir", "Rohan", "Ishaan", "Anya",
    "Sarthak", "Arjun", "Sai", "Reyansh", "Ayaan", "Krishna", "Dhruv", "Ishita", "Meera", "Riya",
    "Aditi", "Kavya", "Anika", "Priya", "Rahul", "Neha", "Pooja", "Vikram", "Sanjay", "Amit",
    "Sneha", "Manish", "Raj", "Simran", "Varun", "Karan", "Nisha", "Ravi", "Sonia", "Deepak",
];

const LAST_NAMES: &[&str] = &[
    "Patel", "Sharma", "Singh", "Kumar", "Gupta", "Verma", "Mehta", "Reddy", "Nair", "Iyer",
    "Shah", "Joshi", "Malhotra", "Bhatia", "Saxena", "Chopra", "Desai", "Jain", "Agarwal", "Mishra",
];

const OBSERVATION_DAYS: i64 = 30;
const RECENT_DROP_DAYS: i64 = 14;
const ASSIGNMENT_COUNT: i64 = 5;
const GRADE_COUNT: i64 = 5;
const FIRST_STUDENT_NUMBER: usize = 2024001;

pub const DEMO_STUDENT_ID: &str = "STD2506";
pub const DEMO_STUDENT_NAME: &str = "Priyanshu Bakshi";
pub const DEMO_STUDENT_EMAIL: &str = "bakshi@gmail.com";

/// Hidden profile driving the generated data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticProfile {
    High,
    Medium,
    Low,
}

impl SyntheticProfile {
    /// 20% high, 30% medium, 50% low
    fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.gen();
        if roll < 0.2 {
            SyntheticProfile::High
        } else if roll < 0.5 {
            SyntheticProfile::Medium
        } else {
            SyntheticProfile::Low
        }
    }
}

/// Generate `count` students observed up to `today`
///
/// The first student is replaced by the fixed demo identity; its generated
/// data is kept so it still scores like any other student.
pub fn generate_students<R: Rng + ?Sized>(
    count: usize,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Student> {
    let mut students = Vec::with_capacity(count);
    let mut distribution = [0usize; 3];

    for i in 0..count {
        let profile = SyntheticProfile::draw(rng);
        distribution[profile as usize] += 1;

        let (first, last) = pick_name(rng);
        let name = format!("{} {}", first, last);

        students.push(Student {
            student_id: format!("S{}", FIRST_STUDENT_NUMBER + i),
            email: format!("{}.{}@university.edu", first, last).to_lowercase(),
            name,
            activity_logs: generate_activity_logs(profile, today, rng),
            assignments: generate_assignments(profile == SyntheticProfile::High, today, rng),
            grades: generate_grades(profile, rng),
        });
    }

    if let Some(demo) = students.first_mut() {
        demo.student_id = DEMO_STUDENT_ID.to_string();
        demo.name = DEMO_STUDENT_NAME.to_string();
        demo.email = DEMO_STUDENT_EMAIL.to_string();
    }

    tracing::info!(
        count = students.len(),
        high = distribution[SyntheticProfile::High as usize],
        medium = distribution[SyntheticProfile::Medium as usize],
        low = distribution[SyntheticProfile::Low as usize],
        "Generated synthetic students"
    );

    students
}

fn pick_name<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Aarav");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Patel");
    (first, last)
}

fn generate_grades<R: Rng + ?Sized>(profile: SyntheticProfile, rng: &mut R) -> Vec<u8> {
    let base: i64 = match profile {
        SyntheticProfile::High => rng.gen_range(50..=65),
        SyntheticProfile::Medium => rng.gen_range(70..=80),
        SyntheticProfile::Low => rng.gen_range(85..=95),
    };

    (0..GRADE_COUNT)
        .map(|i| {
            let mut variation: i64 = rng.gen_range(-8..=8);
            match profile {
                SyntheticProfile::High => variation -= i * rng.gen_range(1..=4),
                SyntheticProfile::Low => variation += i * rng.gen_range(0..=2),
                SyntheticProfile::Medium => {}
            }
            (base + variation).clamp(0, 100) as u8
        })
        .collect()
}

/// Thirty daily logs ending at `today`, oldest first
fn generate_activity_logs<R: Rng + ?Sized>(
    profile: SyntheticProfile,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<ActivityLog> {
    let login_base: i64 = match profile {
        SyntheticProfile::High => rng.gen_range(0..=2),
        SyntheticProfile::Medium => rng.gen_range(2..=4),
        SyntheticProfile::Low => rng.gen_range(3..=6),
    };
    let watch_base: i64 = match profile {
        SyntheticProfile::High => rng.gen_range(0..=30),
        SyntheticProfile::Medium => rng.gen_range(30..=60),
        SyntheticProfile::Low => rng.gen_range(60..=120),
    };
    let drop_severity: f64 = rng.gen_range(0.5..=1.0);

    let mut logs: Vec<ActivityLog> = (0..OBSERVATION_DAYS)
        .map(|days_ago| {
            let mut login_count = (login_base + rng.gen_range(-1..=2)).max(0) as u32;
            let mut video_watch_minutes = (watch_base + rng.gen_range(-20..=40)).max(0) as u32;
            let forum_posts = match profile {
                SyntheticProfile::Low => rng.gen_range(0..=3),
                SyntheticProfile::Medium if rng.gen::<f64>() > 0.7 => 1,
                _ => 0,
            };

            let burning_out = match profile {
                SyntheticProfile::High => true,
                SyntheticProfile::Medium => rng.gen::<f64>() > 0.6,
                SyntheticProfile::Low => false,
            };
            if days_ago < RECENT_DROP_DAYS && burning_out {
                login_count = (login_count as f64 * (1.0 - drop_severity)).floor() as u32;
                video_watch_minutes =
                    (video_watch_minutes as f64 * (1.0 - drop_severity)).floor() as u32;
            }

            ActivityLog {
                date: today - Duration::days(days_ago),
                login_count,
                video_watch_minutes,
                forum_posts,
            }
        })
        .collect();

    logs.reverse();
    logs
}

/// Five weekly assignments, the last one due `today`
fn generate_assignments<R: Rng + ?Sized>(
    at_risk: bool,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Assignment> {
    // Some students are chronically late
    let chronic_lateness: i64 = rng.gen_range(0..=5);

    (1..=ASSIGNMENT_COUNT)
        .map(|i| {
            let due_offset = (ASSIGNMENT_COUNT - i) * 7;
            let due_date = today - Duration::days(due_offset);

            let mut submitted_date =
                Some(today - Duration::days(due_offset + rng.gen_range(-2..=2)));
            let mut grade = Some(rng.gen_range(70..=100u8));

            if at_risk && i > 3 {
                let problem: f64 = rng.gen();
                if problem > 0.6 {
                    submitted_date = None;
                    grade = None;
                } else if problem > 0.3 {
                    let days_late = chronic_lateness + rng.gen_range(1..=7);
                    submitted_date = Some(today - Duration::days(due_offset - days_late));
                    grade = Some(rng.gen_range(40..=65u8));
                }
            }

            Assignment {
                id: Builder::from_random_bytes(rng.gen()).into_uuid().to_string(),
                title: format!("Assignment {}", i),
                due_date,
                submitted_date,
                grade,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_students(10, today(), &mut StdRng::seed_from_u64(7));
        let b = generate_students(10, today(), &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_demo_student_override() {
        let students = generate_students(3, today(), &mut StdRng::seed_from_u64(1));
        assert_eq!(students[0].student_id, DEMO_STUDENT_ID);
        assert_eq!(students[0].name, DEMO_STUDENT_NAME);
        assert_eq!(students[0].email, DEMO_STUDENT_EMAIL);
        assert_eq!(students[1].student_id, "S2024002");
        assert_eq!(students[2].student_id, "S2024003");
        assert!(students[1].email.ends_with("@university.edu"));
        assert_eq!(students[1].email, students[1].email.to_lowercase());
    }

    #[test]
    fn test_generated_shapes() {
        let students = generate_students(25, today(), &mut StdRng::seed_from_u64(42));
        for student in &students {
            assert_eq!(student.activity_logs.len(), 30);
            assert_eq!(student.assignments.len(), 5);
            assert_eq!(student.grades.len(), 5);
            assert!(student.grades.iter().all(|g| *g <= 100));

            let dates: Vec<_> = student.activity_logs.iter().map(|l| l.date).collect();
            assert!(dates.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(*dates.last().unwrap(), today());

            let last = student.assignments.last().unwrap();
            assert_eq!(last.due_date, today());
            assert_eq!(last.title, "Assignment 5");
        }
    }

    #[test]
    fn test_zero_students() {
        assert!(generate_students(0, today(), &mut StdRng::seed_from_u64(0)).is_empty());
    }

    #[test]
    fn test_only_at_risk_students_miss_early_assignments() {
        let assignments = generate_assignments(false, today(), &mut StdRng::seed_from_u64(3));
        assert!(assignments.iter().all(|a| a.submitted_date.is_some() && a.grade.is_some()));
    }
}
