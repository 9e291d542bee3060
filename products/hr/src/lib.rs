//! HR dashboard core: the employee store, its filter predicate, bookmark
//! persistence, and the view models derived from the roster.

pub mod analytics;
pub mod assignment;
pub mod bookmarks;
pub mod detail;
pub mod enrichment;
pub mod error;
pub mod filter;
pub mod model;
pub mod profile;
pub mod source;
pub mod store;

pub use assignment::{LogOnlyAssigner, ProjectAssigner};
pub use bookmarks::{BookmarkSet, STORAGE_KEY};
pub use enrichment::{
    Enrichment, EnrichmentStrategy, FixedEnrichment, RandomEnrichment, RatingRange,
    SeededEnrichment,
};
pub use error::{HrError, HrResult};
pub use filter::FilterCriteria;
pub use model::{Address, Department, Employee, EmployeeForm, EmployeeId, NewEmployee, Rating};
pub use source::{EmployeeSource, HttpEmployeeSource, RemoteUser, SourceError};
pub use store::{EmployeeStore, FetchOutcome, StoreState};
