//! Remote employee directory access.

use std::{future::Future, sync::Arc, time::Duration};

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    enrichment::Enrichment,
    model::{Address, Employee, EmployeeId},
};

/// Records requested per roster fetch.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Records requested when enumerating every known identifier.
pub const ID_LISTING_LIMIT: usize = 100;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to fetch employees: upstream responded with HTTP {0}")]
    Status(u16),
    #[error("Failed to fetch employees: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid employee source url `{0}`")]
    InvalidUrl(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCompany {
    #[serde(default)]
    pub department: Option<String>,
}

/// A user record as the directory returns it, before enrichment.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteUser {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub age: u32,
    pub image: String,
    pub address: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<RemoteCompany>,
}

impl RemoteUser {
    pub fn upstream_department(&self) -> Option<&str> {
        self.company.as_ref()?.department.as_deref()
    }

    pub fn into_employee(self, enrichment: Enrichment) -> Employee {
        Employee {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            age: self.age,
            image: self.image,
            address: self.address,
            department: enrichment.department,
            performance: enrichment.performance,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserPage {
    pub users: Vec<RemoteUser>,
}

/// Where roster data comes from.
pub trait EmployeeSource: Send + Sync {
    fn list_users(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RemoteUser>, SourceError>> + Send;

    /// `Ok(None)` when the directory has no such user.
    fn get_user(
        &self,
        id: EmployeeId,
    ) -> impl Future<Output = Result<Option<RemoteUser>, SourceError>> + Send;
}

impl<S: EmployeeSource> EmployeeSource for Arc<S> {
    fn list_users(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<RemoteUser>, SourceError>> + Send {
        self.as_ref().list_users(limit)
    }

    fn get_user(
        &self,
        id: EmployeeId,
    ) -> impl Future<Output = Result<Option<RemoteUser>, SourceError>> + Send {
        self.as_ref().get_user(id)
    }
}

/// JSON-over-HTTP directory (`GET /users?limit=N`, `GET /users/{id}`).
#[derive(Clone, Debug)]
pub struct HttpEmployeeSource {
    client: Client,
    base_url: Url,
}

impl HttpEmployeeSource {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, SourceError> {
        let mut base_url =
            Url::parse(base_url).map_err(|_| SourceError::InvalidUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base_url.to_string()));
        }
        // Url::join replaces the last segment unless the path ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, SourceError> {
        self.base_url
            .join(path)
            .map_err(|_| SourceError::InvalidUrl(format!("{}{path}", self.base_url)))
    }
}

impl EmployeeSource for HttpEmployeeSource {
    async fn list_users(&self, limit: usize) -> Result<Vec<RemoteUser>, SourceError> {
        let url = self.endpoint("users")?;
        let response = self
            .client
            .get(url)
            .query(&[("limit", limit)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        let page = response.json::<UserPage>().await?;
        tracing::debug!(count = page.users.len(), limit, "directory page received");
        Ok(page.users)
    }

    async fn get_user(&self, id: EmployeeId) -> Result<Option<RemoteUser>, SourceError> {
        let url = self.endpoint(&format!("users/{id}"))?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }
        Ok(Some(response.json::<RemoteUser>().await?))
    }
}
