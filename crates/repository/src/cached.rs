//! Cache-aside repository.
//!
//! Reads check the domain's cache first and fall back to the store. Writes go
//! to the store first; the cache is only touched after the store confirms the
//! write, and only with a value that has already passed validation.

use std::sync::Arc;

use cache::Cache;
use common::EntityId;
use domain::{Criteria, Domain, Validator};
use store::{Entries, Store};

use crate::Result;

/// Validated, cache-accelerated access to one domain's store.
pub struct CachedRepository<D: Domain> {
    store: Arc<dyn Store<D>>,
    cache: Arc<Cache<D>>,
    validator: Validator<D>,
}

impl<D: Domain> Clone for CachedRepository<D> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            validator: self.validator.clone(),
        }
    }
}

impl<D: Domain> CachedRepository<D> {
    /// Creates a repository over `store` and `cache`, validating with the
    /// domain's registered invariants.
    pub fn new(store: Arc<dyn Store<D>>, cache: Arc<Cache<D>>) -> Self {
        Self {
            store,
            cache,
            validator: Validator::for_domain(),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn Store<D>> {
        &self.store
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &Arc<Cache<D>> {
        &self.cache
    }

    /// Loads a value by identity.
    ///
    /// A cache miss is served from the store without populating the cache;
    /// only `create` and `update` write cache entries.
    #[tracing::instrument(skip(self), fields(domain = D::NAME))]
    pub async fn get_one(&self, id: EntityId) -> Result<Option<D>> {
        if let Some(value) = self.cache.get(&id) {
            metrics::counter!("cache_hits_total", "domain" => D::NAME).increment(1);
            return Ok(Some(value));
        }

        metrics::counter!("cache_misses_total", "domain" => D::NAME).increment(1);
        tracing::debug!("cache miss, reading from store");
        Ok(self.store.get_one(id).await?.map(|entry| entry.value))
    }

    /// Lists values matching `criteria`, in storage order. Never cached.
    #[tracing::instrument(skip(self), fields(domain = D::NAME))]
    pub async fn get_by(&self, criteria: &Criteria, skip: usize, limit: usize) -> Result<Entries<D>> {
        Ok(self.store.get_many(criteria, skip, limit).await?)
    }

    /// Validates and persists a new value, then caches it under its new identity.
    #[tracing::instrument(skip(self, value), fields(domain = D::NAME))]
    pub async fn create(&self, value: D) -> Result<EntityId> {
        let value = self.validator.validate(value)?;
        let id = self.store.create(value.clone()).await?;

        self.cache.put(id, value);
        metrics::counter!("repository_writes_total", "domain" => D::NAME, "op" => "create")
            .increment(1);
        tracing::debug!(%id, "created");
        Ok(id)
    }

    /// Validates and overwrites an existing value.
    ///
    /// Returns false if the store has no record with this identity; the cache
    /// is left untouched in that case. An uncached record stays uncached.
    #[tracing::instrument(skip(self, value), fields(domain = D::NAME))]
    pub async fn update(&self, id: EntityId, value: D) -> Result<bool> {
        let value = self.validator.validate(value)?;
        let updated = self.store.update(id, value.clone()).await?;

        // Only a live entry is refreshed; a concurrent delete must stay evicted
        if updated {
            self.cache.replace(id, value);
            metrics::counter!("repository_writes_total", "domain" => D::NAME, "op" => "update")
                .increment(1);
        }
        Ok(updated)
    }

    /// Deletes a value.
    ///
    /// Returns false if the store has no record with this identity; the cache
    /// is left untouched in that case.
    #[tracing::instrument(skip(self), fields(domain = D::NAME))]
    pub async fn delete(&self, id: EntityId) -> Result<bool> {
        let deleted = self.store.delete(id).await?;

        if deleted {
            self.cache.remove(&id);
            metrics::counter!("repository_writes_total", "domain" => D::NAME, "op" => "delete")
                .increment(1);
        }
        Ok(deleted)
    }
}
