//! The employee store: one owner of roster, filters, bookmarks and fetch
//! status, published to any number of readers as whole snapshots.

use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use platform_storage::KeyValueStore;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    assignment::{LogOnlyAssigner, ProjectAssigner},
    bookmarks::BookmarkSet,
    enrichment::{EnrichmentStrategy, RandomEnrichment, RatingRange},
    filter::FilterCriteria,
    model::{Department, Employee, EmployeeId, NewEmployee, Rating},
    source::{DEFAULT_PAGE_SIZE, EmployeeSource},
};

/// Everything a view renders from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub employees: Vec<Employee>,
    pub bookmarked_employees: BookmarkSet,
    #[serde(flatten)]
    pub filters: FilterCriteria,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl StoreState {
    pub fn filtered_employees(&self) -> Vec<&Employee> {
        self.filters.apply(&self.employees).collect()
    }

    /// Loaded employees that are bookmarked, in roster order.
    pub fn bookmarked_roster(&self) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|employee| self.bookmarked_employees.contains(employee.id))
            .collect()
    }

    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.id == id)
    }

    pub fn is_bookmarked(&self, id: EmployeeId) -> bool {
        self.bookmarked_employees.contains(id)
    }

    /// One past the highest loaded id; 1 for an empty roster. Falls back to
    /// the lowest unused id once `EmployeeId::MAX` is taken.
    pub fn next_employee_id(&self) -> EmployeeId {
        match self.employees.iter().map(|employee| employee.id).max() {
            None => 1,
            Some(max) => max.checked_add(1).unwrap_or_else(|| self.lowest_free_id()),
        }
    }

    fn lowest_free_id(&self) -> EmployeeId {
        let taken: HashSet<EmployeeId> = self.employees.iter().map(|employee| employee.id).collect();
        // The roster is far smaller than the id space, so a gap always exists.
        (1..=EmployeeId::MAX)
            .find(|id| !taken.contains(id))
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Roster replaced with this many employees.
    Loaded(usize),
    /// Roster untouched; the message is now in `error`.
    Failed(String),
    /// A later fetch started before this one finished; response dropped.
    Superseded,
}

pub struct EmployeeStore<S> {
    source: S,
    enrichment: Box<dyn EnrichmentStrategy>,
    assigner: Box<dyn ProjectAssigner>,
    storage: Arc<dyn KeyValueStore>,
    persist: Mutex<()>,
    page_size: usize,
    state: watch::Sender<StoreState>,
    generation: AtomicU64,
}

impl<S: EmployeeSource> EmployeeStore<S> {
    /// Builds the store with bookmarks rehydrated from `storage`.
    pub fn new(source: S, storage: Arc<dyn KeyValueStore>) -> Self {
        let bookmarked_employees = BookmarkSet::load(storage.as_ref());
        debug!(count = bookmarked_employees.len(), "bookmarks rehydrated");
        let (state, _) = watch::channel(StoreState {
            bookmarked_employees,
            ..StoreState::default()
        });
        Self {
            source,
            enrichment: Box::new(RandomEnrichment),
            assigner: Box::new(LogOnlyAssigner),
            storage,
            persist: Mutex::new(()),
            page_size: DEFAULT_PAGE_SIZE,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn with_enrichment(mut self, enrichment: impl EnrichmentStrategy + 'static) -> Self {
        self.enrichment = Box::new(enrichment);
        self
    }

    pub fn with_assigner(mut self, assigner: impl ProjectAssigner + 'static) -> Self {
        self.assigner = Box::new(assigner);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn enrichment(&self) -> &dyn EnrichmentStrategy {
        self.enrichment.as_ref()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// Reads the current state without cloning it.
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Replaces the roster with a freshly enriched page from the source.
    ///
    /// Overlapping calls are resolved in favor of the one started last;
    /// earlier responses are discarded whenever they arrive.
    #[tracing::instrument(skip(self), fields(page_size = self.page_size))]
    pub async fn fetch_employees(&self) -> FetchOutcome {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            state.is_loading = true;
            state.error = None;
        });
        debug!(generation, "employee fetch started");

        let result = self.source.list_users(self.page_size).await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.is_loading = false;
            match result {
                Ok(users) => {
                    let mut seen = HashSet::with_capacity(users.len());
                    let employees: Vec<Employee> = users
                        .into_iter()
                        .filter(|user| seen.insert(user.id))
                        .map(|user| {
                            let enrichment = self.enrichment.enrich(&user, RatingRange::ROSTER);
                            user.into_employee(enrichment)
                        })
                        .collect();
                    outcome = FetchOutcome::Loaded(employees.len());
                    state.employees = employees;
                }
                Err(err) => {
                    let message = err.to_string();
                    state.error = Some(message.clone());
                    outcome = FetchOutcome::Failed(message);
                }
            }
            true
        });

        match &outcome {
            FetchOutcome::Loaded(count) => info!(generation, count, "employees loaded"),
            FetchOutcome::Failed(message) => warn!(generation, error = %message, "employee fetch failed"),
            FetchOutcome::Superseded => debug!(generation, "stale employee fetch discarded"),
        }
        outcome
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.state.send_modify(|state| state.filters.search_term = term);
    }

    /// Returns whether `department` is now part of the filter.
    pub fn toggle_department_filter(&self, department: Department) -> bool {
        let mut selected = false;
        self.state
            .send_modify(|state| selected = state.filters.toggle_department(department));
        selected
    }

    /// Returns whether `rating` is now part of the filter.
    pub fn toggle_rating_filter(&self, rating: Rating) -> bool {
        let mut selected = false;
        self.state
            .send_modify(|state| selected = state.filters.toggle_rating(rating));
        selected
    }

    pub fn reset_filters(&self) {
        self.state.send_modify(|state| state.filters.reset());
    }

    /// Flips the bookmark for `employee_id` and saves the set. Returns whether
    /// the id is now bookmarked.
    pub fn toggle_bookmark(&self, employee_id: EmployeeId) -> bool {
        // Spans toggle and save; the watch lock only covers the toggle.
        let _persist = self.persist.lock().unwrap_or_else(PoisonError::into_inner);
        let mut bookmarked = false;
        let mut saved = BookmarkSet::new();
        self.state.send_modify(|state| {
            bookmarked = state.bookmarked_employees.toggle(employee_id);
            saved = state.bookmarked_employees.clone();
        });
        debug!(employee_id, bookmarked, "bookmark toggled");
        if let Err(err) = saved.save(self.storage.as_ref()) {
            warn!(employee_id, error = %err, "failed to persist bookmarks");
        }
        bookmarked
    }

    /// Raises the rating by one step, capped at the maximum. Returns the new
    /// rating, or `None` when no loaded employee has this id.
    pub fn promote_employee(&self, employee_id: EmployeeId) -> Option<Rating> {
        let mut promoted = None;
        self.state.send_if_modified(|state| {
            let Some(employee) = state
                .employees
                .iter_mut()
                .find(|employee| employee.id == employee_id)
            else {
                return false;
            };
            let before = employee.performance;
            employee.performance = before.promoted();
            promoted = Some(employee.performance);
            employee.performance != before
        });
        match promoted {
            Some(rating) => info!(employee_id, %rating, "employee promoted"),
            None => debug!(employee_id, "promotion ignored; employee not loaded"),
        }
        promoted
    }

    pub fn assign_to_project(&self, employee_id: EmployeeId) {
        self.assigner.assign(employee_id);
    }

    /// Appends a manually created employee and returns its new id.
    pub fn add_employee(&self, employee: NewEmployee) -> EmployeeId {
        let mut id = 0;
        self.state.send_modify(|state| {
            id = state.next_employee_id();
            state.employees.push(employee.into_employee(id));
        });
        info!(employee_id = id, "employee added");
        id
    }
}
