//! The roster filter predicate.
//!
//! Every consumer (grid, bookmark list, CLI) derives its visible subset through
//! [`FilterCriteria::matches`]; there is no second copy of this logic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Department, Employee, Rating};

/// Search and facet constraints. Empty facet sets do not restrict.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_term: String,
    pub department_filter: BTreeSet<Department>,
    pub rating_filter: BTreeSet<Rating>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_department(mut self, department: Department) -> Self {
        self.department_filter.insert(department);
        self
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.rating_filter.insert(rating);
        self
    }

    /// Flips membership; returns whether the department is now selected.
    pub fn toggle_department(&mut self, department: Department) -> bool {
        toggle(&mut self.department_filter, department)
    }

    /// Flips membership; returns whether the rating is now selected.
    pub fn toggle_rating(&mut self, rating: Rating) -> bool {
        toggle(&mut self.rating_filter, rating)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn has_facets(&self) -> bool {
        !self.department_filter.is_empty() || !self.rating_filter.is_empty()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.search_term.is_empty() && !self.has_facets()
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        self.matches_search(employee) && self.matches_department(employee) && self.matches_rating(employee)
    }

    pub fn matches_search(&self, employee: &Employee) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        [
            employee.first_name.as_str(),
            employee.last_name.as_str(),
            employee.email.as_str(),
            employee.department.as_str(),
        ]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches_department(&self, employee: &Employee) -> bool {
        self.department_filter.is_empty() || self.department_filter.contains(&employee.department)
    }

    pub fn matches_rating(&self, employee: &Employee) -> bool {
        self.rating_filter.is_empty() || self.rating_filter.contains(&employee.performance)
    }

    pub fn apply<'a>(&'a self, employees: &'a [Employee]) -> impl Iterator<Item = &'a Employee> + 'a {
        employees.iter().filter(move |employee| self.matches(employee))
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}
