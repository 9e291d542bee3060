use platform_storage::StorageError;
use thiserror::Error;

use crate::{model::EmployeeId, source::SourceError};

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("employee {0} not found")]
    NotFound(EmployeeId),
    #[error("bad request: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode persisted state: {0}")]
    Encode(#[from] serde_json::Error),
}

impl HrError {
    /// Whether a manual retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HrError::Source(_) | HrError::Storage(_))
    }
}
