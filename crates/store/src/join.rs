use std::collections::HashSet;

use async_trait::async_trait;
use common::EntityId;

use crate::Result;

/// Directed adjacency from root identities to extension identities.
///
/// One index exists per (root domain, extension domain) pair. Edges have no
/// payload; they are either present or absent. The index does not know
/// whether either endpoint still exists, callers check that.
#[async_trait]
pub trait JoinIndex: Send + Sync {
    /// Adds the edge if absent.
    ///
    /// Returns false if the edge already existed.
    async fn add(&self, root: EntityId, extension: EntityId) -> Result<bool>;

    /// Removes the edge if present.
    ///
    /// Returns false if the edge did not exist.
    async fn remove(&self, root: EntityId, extension: EntityId) -> Result<bool>;

    /// Returns true if the edge exists.
    async fn contains(&self, root: EntityId, extension: EntityId) -> Result<bool>;

    /// Returns every extension linked to `root`.
    async fn linked(&self, root: EntityId) -> Result<HashSet<EntityId>>;
}
