//! Public error taxonomy.

use cache::CacheError;
use common::{EntityId, ParseEntityIdError};
use domain::{CriteriaError, ValidationError};
use repository::RepositoryError;
use store::StoreError;
use thiserror::Error;

/// Errors returned by services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The value violated one or more invariants; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record of this domain has the identity.
    #[error("{domain} not found: {id}")]
    NotFound { domain: &'static str, id: EntityId },

    /// A link or unlink request contradicts the current state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller passed an argument that can never succeed.
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// A write did not take effect as expected.
    #[error("Processing failed: {0}")]
    Processing(String),

    /// A storage or infrastructure failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, Self::IllegalArgument(_))
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Validation(err) => Self::Validation(err),
            RepositoryError::NotFound { domain, id } => Self::NotFound { domain, id },
            RepositoryError::AlreadyLinked { .. } | RepositoryError::NotLinked { .. } => {
                Self::Conflict(err.to_string())
            }
            RepositoryError::Store(err) => err.into(),
            RepositoryError::Cache(err) => err.into(),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Processing { .. } => Self::Processing(err.to_string()),
            StoreError::Criteria(err) => err.into(),
            err => {
                tracing::error!(error = %err, "store failure");
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<CacheError> for ServiceError {
    fn from(err: CacheError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CriteriaError> for ServiceError {
    fn from(err: CriteriaError) -> Self {
        Self::IllegalArgument(err.to_string())
    }
}

impl From<ParseEntityIdError> for ServiceError {
    fn from(err: ParseEntityIdError) -> Self {
        Self::IllegalArgument(err.to_string())
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
