use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, NaiveDate};
use products_hr::{
    Employee, EmployeeForm, EmployeeId, EmployeeStore, FetchOutcome, HrError,
    HttpEmployeeSource, Rating,
    analytics::{bookmark_trend, department_averages, summarize},
    detail::{list_employee_ids, lookup_employee},
    profile::EmployeeProfile,
};
use serde::Serialize;
use serde_json::json;

use crate::ListArgs;

pub struct Dashboard {
    store: Arc<EmployeeStore<HttpEmployeeSource>>,
    json: bool,
}

impl Dashboard {
    pub fn new(store: Arc<EmployeeStore<HttpEmployeeSource>>, json: bool) -> Self {
        Self { store, json }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Fetches the roster; a failure ends the command with the store's error.
    async fn load_roster(&self) -> Result<()> {
        match self.store.fetch_employees().await {
            FetchOutcome::Loaded(_) | FetchOutcome::Superseded => Ok(()),
            FetchOutcome::Failed(message) => bail!("{message} (run the command again to retry)"),
        }
    }

    pub async fn list(&self, args: ListArgs) -> Result<()> {
        self.load_roster().await?;
        if let Some(term) = args.search {
            self.store.set_search_term(term);
        }
        for department in args.departments {
            self.store.toggle_department_filter(department);
        }
        for rating in args.ratings.into_iter().filter_map(Rating::new) {
            self.store.toggle_rating_filter(rating);
        }

        let state = self.store.snapshot();
        let visible = state.filtered_employees();
        if self.json {
            return self.emit(&visible);
        }
        if visible.is_empty() {
            println!("No employees match the current filters.");
            return Ok(());
        }
        for employee in &visible {
            println!("{}", employee_line(employee, state.is_bookmarked(employee.id)));
        }
        println!("{} of {} employees shown", visible.len(), state.employees.len());
        Ok(())
    }

    pub async fn show(&self, id: EmployeeId) -> Result<()> {
        let employee = match lookup_employee(self.store.source(), self.store.enrichment(), id).await {
            Ok(employee) => employee,
            Err(HrError::NotFound(id)) => bail!("employee {id} not found"),
            Err(err) => return Err(with_retry_hint(err)).context("failed to load employee"),
        };
        let bookmarked = self.store.read(|state| state.is_bookmarked(id));
        let profile = EmployeeProfile::build(employee, Self::today(), &mut rand::thread_rng());
        if self.json {
            return self.emit(&json!({ "profile": profile, "bookmarked": bookmarked }));
        }

        let employee = &profile.employee;
        println!("{} ({})", employee.full_name(), employee.initials());
        println!("  {} | {}", employee.department, stars(employee.performance));
        println!("  {} | {}", employee.email, employee.phone);
        println!("  {}, {} {}", employee.address.address, employee.address.city, employee.address.postal_code);
        println!("  age {}{}", employee.age, if bookmarked { " | bookmarked" } else { "" });
        println!();
        println!("{}", profile.summary);
        println!();
        println!("Performance history:");
        for review in &profile.history {
            println!("  {}  {}  {}", review.date, stars(review.rating), review.feedback);
        }
        println!("Projects:");
        for project in &profile.projects {
            println!("  {} ({}) - {}", project.name, project.role, project.status);
        }
        println!("Feedback:");
        for entry in &profile.feedback {
            println!("  {} {} {}: {}", entry.date, entry.from, stars(entry.rating), entry.comment);
        }
        Ok(())
    }

    pub fn bookmark(&self, id: EmployeeId) -> Result<()> {
        let bookmarked = self.store.toggle_bookmark(id);
        if self.json {
            return self.emit(&json!({ "id": id, "bookmarked": bookmarked }));
        }
        if bookmarked {
            println!("Bookmarked employee {id}");
        } else {
            println!("Removed bookmark for employee {id}");
        }
        Ok(())
    }

    pub async fn bookmarks(&self) -> Result<()> {
        self.load_roster().await?;
        let state = self.store.snapshot();
        let loaded = state.bookmarked_roster();
        let dangling: Vec<EmployeeId> = state
            .bookmarked_employees
            .iter()
            .filter(|id| state.employee(*id).is_none())
            .collect();
        if self.json {
            return self.emit(&json!({ "employees": loaded, "notLoaded": dangling }));
        }
        if loaded.is_empty() {
            println!("You haven't bookmarked any loaded employees yet.");
        }
        for employee in &loaded {
            println!("{}", employee_line(employee, true));
        }
        if !dangling.is_empty() {
            let ids: Vec<String> = dangling.iter().map(ToString::to_string).collect();
            println!("Bookmarked but not loaded: {}", ids.join(", "));
        }
        Ok(())
    }

    pub async fn promote(&self, id: EmployeeId) -> Result<()> {
        self.load_roster().await?;
        let before = self.store.read(|state| state.employee(id).map(|e| e.performance));
        let Some(after) = self.store.promote_employee(id) else {
            bail!("employee {id} is not in the loaded roster");
        };
        if self.json {
            return self.emit(&json!({ "id": id, "before": before, "after": after }));
        }
        match before {
            Some(before) if before == after => println!("Employee {id} is already at {}", stars(after)),
            _ => println!("Employee {id} promoted to {}", stars(after)),
        }
        Ok(())
    }

    pub fn assign(&self, id: EmployeeId) -> Result<()> {
        self.store.assign_to_project(id);
        if !self.json {
            println!("Employee {id} assigned to project");
        }
        Ok(())
    }

    pub async fn add(&self, form: EmployeeForm) -> Result<()> {
        let new_employee = form.validate()?;
        if let Err(err) = self.load_roster().await {
            tracing::warn!(error = %err, "adding to an empty roster");
        }
        let id = self.store.add_employee(new_employee);
        let state = self.store.snapshot();
        let employee = state.employee(id).context("added employee missing from roster")?;
        if self.json {
            return self.emit(employee);
        }
        println!("Employee added successfully!");
        println!("{}", employee_line(employee, state.is_bookmarked(id)));
        Ok(())
    }

    pub async fn analytics(&self) -> Result<()> {
        self.load_roster().await?;
        let state = self.store.snapshot();
        let averages = department_averages(&state.employees);
        let summary = summarize(&state.employees, &state.bookmarked_employees);
        let trend = bookmark_trend(Self::today(), &mut rand::thread_rng());
        if self.json {
            return self.emit(&json!({
                "departmentAverages": averages,
                "summary": summary,
                "bookmarkTrend": trend,
            }));
        }

        println!("Average performance rating by department:");
        for row in &averages {
            println!("  {:<12} {:.2} ({} employees)", row.department.as_str(), row.average, row.headcount);
        }
        println!("Bookmarks added in the last 7 days:");
        for point in &trend {
            println!("  {} {}", point.label, "#".repeat(point.count as usize));
        }
        println!("Quick stats:");
        println!("  Total employees: {}", summary.total_employees);
        println!("  Bookmarked: {}", summary.bookmarked);
        match summary.average_rating {
            Some(avg) => println!("  Avg. performance: {avg:.1}"),
            None => println!("  Avg. performance: n/a"),
        }
        Ok(())
    }

    pub async fn ids(&self, limit: usize) -> Result<()> {
        let ids = list_employee_ids(self.store.source(), limit)
            .await
            .map_err(with_retry_hint)
            .context("failed to list employee ids")?;
        if self.json {
            return self.emit(&ids);
        }
        for id in ids {
            println!("{id}");
        }
        Ok(())
    }
}

/// Transient failures get the same retry hint as a failed roster fetch.
fn with_retry_hint(err: HrError) -> anyhow::Error {
    if err.is_retryable() {
        anyhow!(err).context("run the command again to retry")
    } else {
        anyhow!(err)
    }
}

fn stars(rating: Rating) -> String {
    let filled = usize::from(rating.get());
    let empty = usize::from(Rating::MAX) - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

fn employee_line(employee: &Employee, bookmarked: bool) -> String {
    format!(
        "{:>4} {} {:<24} {:<12} {} {}",
        employee.id,
        if bookmarked { '*' } else { ' ' },
        employee.full_name(),
        employee.department.as_str(),
        stars(employee.performance),
        employee.email,
    )
}
