#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    io,
    sync::{Arc, Mutex, mpsc},
};

use platform_storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};
use products_hr::{
    Address, Department, Enrichment, EmployeeId, EmployeeSource, EmployeeStore, FixedEnrichment,
    NewEmployee, ProjectAssigner, Rating, RemoteUser, SourceError,
    source::RemoteCompany,
};
use tokio::sync::oneshot;

pub type Page = Result<Vec<RemoteUser>, SourceError>;

pub fn remote_user(id: EmployeeId, first: &str, last: &str) -> RemoteUser {
    RemoteUser {
        id,
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@corp.test", first.to_lowercase(), last.to_lowercase()),
        phone: "+1 555 0000".into(),
        age: 33,
        image: format!("https://img.test/{id}.png"),
        address: Address {
            address: format!("{id} Market Street"),
            city: "Denver".into(),
            postal_code: "80202".into(),
            state: Some("Colorado".into()),
        },
        company: None,
    }
}

pub fn with_company_department(mut user: RemoteUser, department: &str) -> RemoteUser {
    user.company = Some(RemoteCompany {
        department: Some(department.into()),
    });
    user
}

pub fn new_employee(first: &str) -> NewEmployee {
    NewEmployee {
        first_name: first.into(),
        last_name: "Added".into(),
        email: format!("{}@corp.test", first.to_lowercase()),
        phone: "+1 555 1111".into(),
        age: 29,
        image: String::new(),
        address: Address {
            address: "9 Side St".into(),
            city: "Austin".into(),
            postal_code: "73301".into(),
            state: None,
        },
        department: Department::Product,
        performance: None,
    }
}

pub fn fixed(department: Department, rating: u8) -> FixedEnrichment {
    FixedEnrichment(Enrichment {
        department,
        performance: Rating::new(rating).unwrap(),
    })
}

/// Serves queued pages in order and single users from a map.
#[derive(Default)]
pub struct ScriptedSource {
    pages: Mutex<VecDeque<Page>>,
    users: HashMap<EmployeeId, RemoteUser>,
    limits: Mutex<Vec<usize>>,
}

impl ScriptedSource {
    pub fn new(pages: impl IntoIterator<Item = Page>) -> Self {
        Self {
            pages: Mutex::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn with_user(mut self, user: RemoteUser) -> Self {
        self.users.insert(user.id, user);
        self
    }

    pub fn requested_limits(&self) -> Vec<usize> {
        self.limits.lock().unwrap().clone()
    }
}

impl EmployeeSource for ScriptedSource {
    async fn list_users(&self, limit: usize) -> Result<Vec<RemoteUser>, SourceError> {
        self.limits.lock().unwrap().push(limit);
        let next = self.pages.lock().unwrap().pop_front();
        next.unwrap_or(Err(SourceError::Status(503)))
    }

    async fn get_user(&self, id: EmployeeId) -> Result<Option<RemoteUser>, SourceError> {
        Ok(self.users.get(&id).cloned())
    }
}

/// Each `list_users` call waits for the sender handed out by `gate()`.
#[derive(Default)]
pub struct GatedSource {
    gates: Mutex<VecDeque<oneshot::Receiver<Page>>>,
}

impl GatedSource {
    pub fn gate(&self) -> oneshot::Sender<Page> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }
}

impl EmployeeSource for GatedSource {
    async fn list_users(&self, _limit: usize) -> Result<Vec<RemoteUser>, SourceError> {
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx.await.unwrap_or(Err(SourceError::Status(499))),
            None => Err(SourceError::Status(500)),
        }
    }

    async fn get_user(&self, _id: EmployeeId) -> Result<Option<RemoteUser>, SourceError> {
        Ok(None)
    }
}

#[derive(Default)]
pub struct RecordingAssigner {
    pub assigned: Arc<Mutex<Vec<EmployeeId>>>,
}

impl ProjectAssigner for RecordingAssigner {
    fn assign(&self, employee_id: EmployeeId) {
        self.assigned.lock().unwrap().push(employee_id);
    }
}

/// Every read and write fails as an unavailable disk would.
pub struct FailingStore;

impl FailingStore {
    fn unavailable() -> StorageError {
        StorageError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "storage unavailable"))
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Err(Self::unavailable())
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(Self::unavailable())
    }

    fn remove(&self, _key: &str) -> StorageResult<()> {
        Err(Self::unavailable())
    }
}

/// A memory store whose `set` announces itself and then waits to be released.
pub struct HeldStore {
    inner: MemoryStore,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl HeldStore {
    /// Returns the store, a receiver signalled when a write starts, and the
    /// sender that lets that write finish.
    pub fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let store = Self {
            inner: MemoryStore::new(),
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        (store, entered_rx, release_tx)
    }
}

impl KeyValueStore for HeldStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner.remove(key)
    }
}

pub fn memory_storage() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}

pub fn scripted_store(
    pages: impl IntoIterator<Item = Page>,
    department: Department,
    rating: u8,
) -> EmployeeStore<ScriptedSource> {
    EmployeeStore::new(ScriptedSource::new(pages), memory_storage())
        .with_enrichment(fixed(department, rating))
}
