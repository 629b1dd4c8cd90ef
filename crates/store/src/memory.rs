use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{Criteria, Domain};
use indexmap::IndexMap;
use tokio::sync::RwLock;

use crate::{
    Entries, Entry, Result, StoreError,
    join::JoinIndex,
    store::Store,
};

/// In-memory store implementation.
///
/// Records are kept in insertion order; deleting a record keeps the relative
/// order of the rest.
#[derive(Clone)]
pub struct InMemoryStore<D> {
    records: Arc<RwLock<IndexMap<EntityId, D>>>,
}

impl<D: Domain> InMemoryStore<D> {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Clears all records.
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

impl<D: Domain> Default for InMemoryStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Domain> Store<D> for InMemoryStore<D> {
    async fn get_one(&self, id: EntityId) -> Result<Option<Entry<D>>> {
        let records = self.records.read().await;
        Ok(records.get(&id).map(|value| Entry::new(id, value.clone())))
    }

    async fn get_many(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Entries<D>> {
        let records = self.records.read().await;
        let mut matched = IndexMap::new();
        let mut skipped = 0;

        for (id, value) in records.iter() {
            if matched.len() >= limit {
                break;
            }
            if !criteria.matches(value)? {
                continue;
            }
            if skipped < skip {
                skipped += 1;
                continue;
            }
            matched.insert(*id, value.clone());
        }

        Ok(matched)
    }

    async fn create(&self, value: D) -> Result<EntityId> {
        let id = EntityId::new();
        let mut records = self.records.write().await;

        // A colliding v4 identity would overwrite a live record
        if records.contains_key(&id) {
            return Err(StoreError::Processing {
                domain: D::NAME,
                affected: 0,
            });
        }

        records.insert(id, value);
        Ok(id)
    }

    async fn update(&self, id: EntityId, value: D) -> Result<bool> {
        let mut records = self.records.write().await;
        match records.get_mut(&id) {
            Some(slot) => {
                *slot = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: EntityId) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(records.shift_remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}

/// In-memory join index implementation.
#[derive(Clone, Default)]
pub struct InMemoryJoinIndex {
    edges: Arc<RwLock<HashMap<EntityId, HashSet<EntityId>>>>,
}

impl InMemoryJoinIndex {
    /// Creates a new empty join index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of edges.
    pub async fn edge_count(&self) -> usize {
        self.edges.read().await.values().map(HashSet::len).sum()
    }
}

#[async_trait]
impl JoinIndex for InMemoryJoinIndex {
    async fn add(&self, root: EntityId, extension: EntityId) -> Result<bool> {
        let mut edges = self.edges.write().await;
        Ok(edges.entry(root).or_default().insert(extension))
    }

    async fn remove(&self, root: EntityId, extension: EntityId) -> Result<bool> {
        let mut edges = self.edges.write().await;
        let Some(linked) = edges.get_mut(&root) else {
            return Ok(false);
        };
        let removed = linked.remove(&extension);
        if linked.is_empty() {
            edges.remove(&root);
        }
        Ok(removed)
    }

    async fn contains(&self, root: EntityId, extension: EntityId) -> Result<bool> {
        let edges = self.edges.read().await;
        Ok(edges
            .get(&root)
            .is_some_and(|linked| linked.contains(&extension)))
    }

    async fn linked(&self, root: EntityId) -> Result<HashSet<EntityId>> {
        let edges = self.edges.read().await;
        Ok(edges.get(&root).cloned().unwrap_or_default())
    }
}
