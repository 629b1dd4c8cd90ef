use async_trait::async_trait;
use common::EntityId;
use domain::{Criteria, Domain};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A persisted value together with its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<D> {
    pub id: EntityId,
    pub value: D,
}

impl<D> Entry<D> {
    pub fn new(id: EntityId, value: D) -> Self {
        Self { id, value }
    }
}

impl<D> From<(EntityId, D)> for Entry<D> {
    fn from((id, value): (EntityId, D)) -> Self {
        Self { id, value }
    }
}

/// Ordered map of matching records, in storage order.
pub type Entries<D> = IndexMap<EntityId, D>;

/// Core trait for per-domain record stores.
///
/// A store owns identity assignment: callers never supply an identity on
/// create. Validation happens above this layer; a store persists whatever it
/// is given. All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Store<D: Domain>: Send + Sync {
    /// Retrieves a single record.
    ///
    /// Returns None if no record has this identity.
    async fn get_one(&self, id: EntityId) -> Result<Option<Entry<D>>>;

    /// Retrieves records matching `criteria`.
    ///
    /// `skip` and `limit` apply after filtering, in storage order.
    async fn get_many(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Entries<D>>;

    /// Persists a new record under a fresh identity and returns it.
    ///
    /// Fails with `Processing` unless exactly one record was written.
    async fn create(&self, value: D) -> Result<EntityId>;

    /// Overwrites an existing record.
    ///
    /// Returns false, without creating anything, if no record has this identity.
    async fn update(&self, id: EntityId, value: D) -> Result<bool>;

    /// Removes a record.
    ///
    /// Returns false if no record has this identity.
    async fn delete(&self, id: EntityId) -> Result<bool>;

    /// Number of records currently held.
    async fn count(&self) -> Result<usize>;
}

/// Extension trait providing convenience methods for stores.
#[async_trait]
pub trait StoreExt<D: Domain>: Store<D> {
    /// Checks if a record with this identity exists.
    async fn exists(&self, id: EntityId) -> Result<bool> {
        Ok(self.get_one(id).await?.is_some())
    }

    /// Retrieves every record matching `criteria`.
    async fn get_all(&self, criteria: &Criteria) -> Result<Entries<D>> {
        self.get_many(criteria, 0, usize::MAX).await
    }
}

// Blanket implementation for all Store implementations
impl<D: Domain, S: Store<D> + ?Sized> StoreExt<D> for S {}
