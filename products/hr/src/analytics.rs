//! Aggregates for the analytics page.

use chrono::{Days, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::{
    bookmarks::BookmarkSet,
    model::{Department, Employee},
};

const TREND_DAYS: u64 = 7;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepartmentAverage {
    pub department: Department,
    pub average: f64,
    pub headcount: usize,
}

/// Mean rating per department, in order of first appearance in the roster.
pub fn department_averages(employees: &[Employee]) -> Vec<DepartmentAverage> {
    let mut totals: Vec<(Department, u32, usize)> = Vec::new();
    for employee in employees {
        let rating = u32::from(employee.performance.get());
        match totals.iter_mut().find(|(dept, _, _)| *dept == employee.department) {
            Some((_, sum, count)) => {
                *sum += rating;
                *count += 1;
            }
            None => totals.push((employee.department, rating, 1)),
        }
    }
    totals
        .into_iter()
        .map(|(department, sum, headcount)| DepartmentAverage {
            department,
            average: f64::from(sum) / headcount as f64,
            headcount,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RosterSummary {
    pub total_employees: usize,
    /// Size of the bookmark set, including ids that are not loaded.
    pub bookmarked: usize,
    /// `None` for an empty roster.
    pub average_rating: Option<f64>,
}

pub fn summarize(employees: &[Employee], bookmarks: &BookmarkSet) -> RosterSummary {
    let average_rating = (!employees.is_empty()).then(|| {
        let sum: u32 = employees
            .iter()
            .map(|employee| u32::from(employee.performance.get()))
            .sum();
        f64::from(sum) / employees.len() as f64
    });
    RosterSummary {
        total_employees: employees.len(),
        bookmarked: bookmarks.len(),
        average_rating,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub count: u32,
}

/// Mock bookmark activity for the seven days ending `today`, oldest first.
pub fn bookmark_trend<R: Rng + ?Sized>(today: NaiveDate, rng: &mut R) -> Vec<TrendPoint> {
    (0..TREND_DAYS)
        .rev()
        .map(|offset| {
            let date = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
            TrendPoint {
                date,
                label: date.format("%a").to_string(),
                count: rng.gen_range(1..=5),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::model::{Address, Rating};

    fn employee(id: u64, department: Department, rating: u8) -> Employee {
        Employee {
            id,
            first_name: format!("E{id}"),
            last_name: "Test".into(),
            email: format!("e{id}@corp.test"),
            phone: "0".into(),
            age: 30,
            image: String::new(),
            address: Address {
                address: "x".into(),
                city: "y".into(),
                postal_code: "z".into(),
                state: None,
            },
            department,
            performance: Rating::new(rating).unwrap(),
        }
    }

    #[test]
    fn averages_follow_first_appearance() {
        let roster = vec![
            employee(1, Department::Sales, 2),
            employee(2, Department::Design, 5),
            employee(3, Department::Sales, 5),
        ];
        let averages = department_averages(&roster);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages[0].department, Department::Sales);
        assert_eq!(averages[0].average, 3.5);
        assert_eq!(averages[0].headcount, 2);
        assert_eq!(averages[1].department, Department::Design);
        assert_eq!(averages[1].average, 5.0);
    }

    #[test]
    fn summary_counts_dangling_bookmarks() {
        let roster = vec![employee(1, Department::Hr, 4), employee(2, Department::Hr, 3)];
        let bookmarks: BookmarkSet = vec![1, 99].into();
        let summary = summarize(&roster, &bookmarks);
        assert_eq!(summary.total_employees, 2);
        assert_eq!(summary.bookmarked, 2);
        assert_eq!(summary.average_rating, Some(3.5));

        assert_eq!(summarize(&[], &BookmarkSet::new()).average_rating, None);
    }

    #[test]
    fn trend_covers_the_last_week() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let trend = bookmark_trend(today, &mut StdRng::seed_from_u64(11));
        assert_eq!(trend.len(), 7);
        assert_eq!(trend[6].date, today);
        assert_eq!(trend[6].label, "Sun");
        assert_eq!(trend[0].label, "Mon");
        assert!(trend.iter().all(|point| (1..=5).contains(&point.count)));
    }
}
