use domain::CriteriaError;
use thiserror::Error;

/// Errors that can occur when interacting with a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write did not affect exactly one record.
    #[error("Expected to affect exactly one {domain} record, affected {affected}")]
    Processing { domain: &'static str, affected: u64 },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The query criteria could not be built or evaluated.
    #[error("Criteria error: {0}")]
    Criteria(#[from] CriteriaError),

    /// The registry holds a store of another type under this domain name.
    #[error("Store registry type mismatch for domain {domain}")]
    Registry { domain: &'static str },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
