//! Detail-page view model: review history, projects and peer feedback.

use std::fmt;

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::model::{Employee, Rating};

const HISTORY_LEN: u64 = 4;
const REVIEW_INTERVAL_DAYS: u64 = 90;

const REVIEW_NOTES: [&str; 5] = [
    "Excellent work",
    "Good progress",
    "Meeting expectations",
    "Needs improvement",
    "Performance issues",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PerformanceReview {
    pub sequence: u64,
    pub date: NaiveDate,
    pub rating: Rating,
    pub feedback: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProjectStatus {
    InProgress,
    Completed,
    Planning,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Planning => "Planning",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub id: u32,
    pub name: &'static str,
    pub role: &'static str,
    pub status: ProjectStatus,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub id: u32,
    pub date: &'static str,
    pub from: &'static str,
    pub rating: Rating,
    pub comment: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EmployeeProfile {
    pub employee: Employee,
    /// Oldest review first.
    pub history: Vec<PerformanceReview>,
    pub projects: Vec<ProjectRecord>,
    pub feedback: Vec<FeedbackEntry>,
    pub summary: String,
}

impl EmployeeProfile {
    pub fn build<R: Rng + ?Sized>(employee: Employee, today: NaiveDate, rng: &mut R) -> Self {
        let history = review_history(&employee, today, rng);
        let summary = format!(
            "{} is a dedicated professional with expertise in {} operations. \
             With a consistent performance rating and commitment to excellence, \
             they have been an important team member since joining the company.",
            employee.full_name(),
            employee.department.as_str().to_lowercase(),
        );
        Self {
            employee,
            history,
            projects: sample_projects(),
            feedback: sample_feedback(),
            summary,
        }
    }
}

/// Quarterly reviews jittered by one step around the current rating.
pub fn review_history<R: Rng + ?Sized>(
    employee: &Employee,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PerformanceReview> {
    let current = i64::from(employee.performance.get());
    let mut history: Vec<PerformanceReview> = (1..=HISTORY_LEN)
        .map(|sequence| PerformanceReview {
            sequence,
            date: today
                .checked_sub_days(Days::new(sequence * REVIEW_INTERVAL_DAYS))
                .unwrap_or(today),
            rating: Rating::clamped(current + rng.gen_range(-1..=1)),
            feedback: REVIEW_NOTES[rng.gen_range(0..REVIEW_NOTES.len())],
        })
        .collect();
    history.reverse();
    history
}

pub fn sample_projects() -> Vec<ProjectRecord> {
    vec![
        ProjectRecord {
            id: 1,
            name: "Website Redesign",
            role: "Lead Developer",
            status: ProjectStatus::InProgress,
        },
        ProjectRecord {
            id: 2,
            name: "Mobile App",
            role: "Developer",
            status: ProjectStatus::Completed,
        },
        ProjectRecord {
            id: 3,
            name: "API Integration",
            role: "Technical Lead",
            status: ProjectStatus::Planning,
        },
    ]
}

pub fn sample_feedback() -> Vec<FeedbackEntry> {
    vec![
        FeedbackEntry {
            id: 1,
            date: "2025-03-15",
            from: "Jane Smith",
            rating: Rating::clamped(4),
            comment: "Great team player, always delivers on time.",
        },
        FeedbackEntry {
            id: 2,
            date: "2025-02-10",
            from: "Michael Brown",
            rating: Rating::clamped(5),
            comment: "Exceptional problem-solving skills.",
        },
        FeedbackEntry {
            id: 3,
            date: "2025-01-05",
            from: "Sarah Johnson",
            rating: Rating::clamped(3),
            comment: "Good work, but could improve communication.",
        },
    ]
}
