//! Type-tagged store registry.
//!
//! Holds exactly one store per domain type and one join index per
//! (root, extension) pair, created on first request from the configured
//! backend and shared afterwards.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use domain::Domain;
use sqlx::PgPool;

use crate::{
    InMemoryJoinIndex, InMemoryStore, PostgresJoinIndex, PostgresStore, Result, StoreError,
    join::JoinIndex, store::Store,
};

/// Persistence backend new stores are bound to.
#[derive(Clone, Debug)]
pub enum Backend {
    /// Process-local, non-durable storage.
    Memory,
    /// PostgreSQL through a shared connection pool.
    Postgres(PgPool),
}

/// Registry of per-domain stores and per-pair join indexes.
pub struct StoreRegistry {
    backend: Backend,
    stores: DashMap<&'static str, Arc<dyn Any + Send + Sync>>,
    joins: DashMap<(&'static str, &'static str), Arc<dyn JoinIndex>>,
}

impl StoreRegistry {
    /// Creates a registry whose stores live in memory.
    pub fn in_memory() -> Self {
        Self::new(Backend::Memory)
    }

    /// Creates a registry whose stores live in PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Backend::Postgres(pool))
    }

    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            stores: DashMap::new(),
            joins: DashMap::new(),
        }
    }

    /// Returns the backend new stores are bound to.
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Returns the store for domain `D`, creating it on first use.
    pub fn store<D: Domain>(&self) -> Result<Arc<dyn Store<D>>> {
        let entry = self.stores.entry(D::NAME).or_insert_with(|| {
            tracing::debug!(domain = D::NAME, "creating store");
            Arc::new(self.build_store::<D>()) as Arc<dyn Any + Send + Sync>
        });

        entry
            .value()
            .clone()
            .downcast::<Arc<dyn Store<D>>>()
            .map(|store| Arc::clone(&*store))
            .map_err(|_| StoreError::Registry { domain: D::NAME })
    }

    /// Registers an explicit store for domain `D`, replacing any existing one.
    pub fn insert_store<D: Domain>(&self, store: Arc<dyn Store<D>>) {
        self.stores
            .insert(D::NAME, Arc::new(store) as Arc<dyn Any + Send + Sync>);
    }

    /// Returns the join index for the `T -> U` pair, creating it on first use.
    pub fn join_index<T: Domain, U: Domain>(&self) -> Arc<dyn JoinIndex> {
        self.joins
            .entry((T::NAME, U::NAME))
            .or_insert_with(|| {
                tracing::debug!(root = T::NAME, extension = U::NAME, "creating join index");
                self.build_join_index::<T, U>()
            })
            .value()
            .clone()
    }

    fn build_store<D: Domain>(&self) -> Arc<dyn Store<D>> {
        match &self.backend {
            Backend::Memory => Arc::new(InMemoryStore::<D>::new()),
            Backend::Postgres(pool) => Arc::new(PostgresStore::<D>::new(pool.clone())),
        }
    }

    fn build_join_index<T: Domain, U: Domain>(&self) -> Arc<dyn JoinIndex> {
        match &self.backend {
            Backend::Memory => Arc::new(InMemoryJoinIndex::new()),
            Backend::Postgres(pool) => Arc::new(PostgresJoinIndex::between::<T, U>(pool.clone())),
        }
    }
}

impl Default for StoreRegistry {
    fn default() -> Self {
        Self::in_memory()
    }
}
