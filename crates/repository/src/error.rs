use cache::CacheError;
use common::EntityId;
use domain::ValidationError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The value violated one or more invariants; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record of this domain has the identity.
    #[error("{domain} not found: {id}")]
    NotFound { domain: &'static str, id: EntityId },

    /// Link requested for a pair that is already linked.
    #[error("{root} {root_id} is already linked to {extension} {extension_id}")]
    AlreadyLinked {
        root: &'static str,
        root_id: EntityId,
        extension: &'static str,
        extension_id: EntityId,
    },

    /// Unlink requested for a pair that is not linked.
    #[error("{root} {root_id} is not linked to {extension} {extension_id}")]
    NotLinked {
        root: &'static str,
        root_id: EntityId,
        extension: &'static str,
        extension_id: EntityId,
    },

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An error occurred in the cache registry.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl RepositoryError {
    /// Returns true for link/unlink conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyLinked { .. } | Self::NotLinked { .. })
    }

    /// Returns true if an identity was absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
