//! The bookmark set and its persisted form.

use platform_storage::KeyValueStore;
use serde::{Deserialize, Serialize};

use crate::{error::HrResult, model::EmployeeId};

/// Namespace key of the persisted dashboard entry.
pub const STORAGE_KEY: &str = "employee-storage";

/// Insertion-ordered set of bookmarked employee ids.
///
/// Ids are not checked against the roster; a bookmark may outlive the
/// employee it points at.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "Vec<EmployeeId>", into = "Vec<EmployeeId>")]
pub struct BookmarkSet {
    ids: Vec<EmployeeId>,
}

impl BookmarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.ids.contains(&id)
    }

    /// Flips membership; returns whether `id` is now bookmarked.
    pub fn toggle(&mut self, id: EmployeeId) -> bool {
        if let Some(pos) = self.ids.iter().position(|existing| *existing == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EmployeeId> + '_ {
        self.ids.iter().copied()
    }

    pub fn save(&self, storage: &dyn KeyValueStore) -> HrResult<()> {
        let payload = serde_json::to_string(&PersistedState {
            bookmarked_employees: self.clone(),
        })?;
        storage.set(STORAGE_KEY, &payload)?;
        Ok(())
    }

    /// Absent, unreadable, or corrupt entries all load as an empty set.
    pub fn load(storage: &dyn KeyValueStore) -> Self {
        let raw = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                tracing::warn!(error = %err, "bookmark storage unreadable; starting empty");
                return Self::default();
            }
        };
        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(state) => state.bookmarked_employees,
            Err(err) => {
                tracing::warn!(error = %err, "persisted bookmarks corrupt; starting empty");
                Self::default()
            }
        }
    }
}

impl FromIterator<EmployeeId> for BookmarkSet {
    fn from_iter<I: IntoIterator<Item = EmployeeId>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            if !set.contains(id) {
                set.ids.push(id);
            }
        }
        set
    }
}

impl From<Vec<EmployeeId>> for BookmarkSet {
    fn from(ids: Vec<EmployeeId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<BookmarkSet> for Vec<EmployeeId> {
    fn from(set: BookmarkSet) -> Self {
        set.ids
    }
}

/// The only slice of store state that survives a restart.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default)]
    bookmarked_employees: BookmarkSet,
}
