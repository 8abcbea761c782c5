use std::time::Duration;

use thiserror::Error;
use workspace_client::WorkspaceError;

#[derive(Debug, Error)]
pub enum VectorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Workspace API error: {0}")]
    Upstream(#[from] WorkspaceError),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Malformed search response: {0}")]
    Search(String),

    #[error("{resource} failed to provision: {message}")]
    ProvisioningFailed { resource: String, message: String },

    #[error("Timed out after {waited:?} waiting for {resource} to become ready")]
    ProvisioningTimeout { resource: String, waited: Duration },
}

pub type VectorResult<T> = Result<T, VectorError>;

impl VectorError {
    /// Transport failures, non-2xx answers and unreadable bodies from the service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            VectorError::Upstream(_) | VectorError::Search(_) | VectorError::Embedding(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            VectorError::NotFound(_) => true,
            VectorError::Upstream(e) => e.is_not_found(),
            _ => false,
        }
    }
}
