//! Store error types

use orgmgr_domain::OrgError;
use thiserror::Error;

/// Domain store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique key is already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A change set precondition no longer holds
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// A change references a record that does not exist
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Backend could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for domain store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for OrgError {
    fn from(err: StoreError) -> Self {
        OrgError::Storage(err.to_string())
    }
}
