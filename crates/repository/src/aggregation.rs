//! Many-to-many aggregation between a root domain and an extension domain.
//!
//! Edges live in a [`JoinIndex`]; endpoint records live in their own stores.
//! Deleting an endpoint does not prune its edges. Instead every operation
//! checks that both endpoints still exist before it trusts an edge, so an
//! edge to a deleted record can never be observed.

use std::sync::Arc;

use common::EntityId;
use domain::{Criteria, Domain, Validator};
use store::{Entry, JoinIndex, Store, StoreError, StoreExt};

use crate::{RepositoryError, Result};

/// Links extension records of domain `U` to root records of domain `T`.
pub struct AggregationRepository<T: Domain, U: Domain> {
    roots: Arc<dyn Store<T>>,
    extensions: Arc<dyn Store<U>>,
    index: Arc<dyn JoinIndex>,
    validator: Validator<U>,
}

impl<T: Domain, U: Domain> Clone for AggregationRepository<T, U> {
    fn clone(&self) -> Self {
        Self {
            roots: Arc::clone(&self.roots),
            extensions: Arc::clone(&self.extensions),
            index: Arc::clone(&self.index),
            validator: self.validator.clone(),
        }
    }
}

impl<T: Domain, U: Domain> AggregationRepository<T, U> {
    /// Creates a repository over the two stores and their join index.
    pub fn new(
        roots: Arc<dyn Store<T>>,
        extensions: Arc<dyn Store<U>>,
        index: Arc<dyn JoinIndex>,
    ) -> Self {
        Self {
            roots,
            extensions,
            index,
            validator: Validator::for_domain(),
        }
    }

    /// Adds the edge `root_id -> extension_id`.
    ///
    /// Fails with `NotFound` if either endpoint is absent and with
    /// `AlreadyLinked` if the edge exists.
    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn link(&self, root_id: EntityId, extension_id: EntityId) -> Result<()> {
        self.require_root(root_id).await?;
        self.require_extension(extension_id).await?;

        if !self.index.add(root_id, extension_id).await? {
            metrics::counter!("aggregation_conflicts_total", "op" => "link").increment(1);
            tracing::warn!(%root_id, %extension_id, "link conflict");
            return Err(RepositoryError::AlreadyLinked {
                root: T::NAME,
                root_id,
                extension: U::NAME,
                extension_id,
            });
        }
        Ok(())
    }

    /// Removes the edge `root_id -> extension_id`.
    ///
    /// Fails with `NotFound` if either endpoint is absent and with
    /// `NotLinked` if the edge does not exist.
    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn unlink(&self, root_id: EntityId, extension_id: EntityId) -> Result<()> {
        self.require_root(root_id).await?;
        self.require_extension(extension_id).await?;

        if !self.index.remove(root_id, extension_id).await? {
            metrics::counter!("aggregation_conflicts_total", "op" => "unlink").increment(1);
            tracing::warn!(%root_id, %extension_id, "unlink conflict");
            return Err(RepositoryError::NotLinked {
                root: T::NAME,
                root_id,
                extension: U::NAME,
                extension_id,
            });
        }
        Ok(())
    }

    /// Validates and creates an extension record, then links it to `root_id`.
    #[tracing::instrument(skip(self, value), fields(root = T::NAME, extension = U::NAME))]
    pub async fn create_on(&self, root_id: EntityId, value: U) -> Result<EntityId> {
        self.require_root(root_id).await?;
        let value = self.validator.validate(value)?;

        let extension_id = self.extensions.create(value).await?;

        // The identity is fresh, so the edge cannot already exist
        if !self.index.add(root_id, extension_id).await? {
            return Err(StoreError::Processing {
                domain: U::NAME,
                affected: 0,
            }
            .into());
        }
        tracing::debug!(%extension_id, "created and linked");
        Ok(extension_id)
    }

    /// Loads an extension record through its link to `root_id`.
    ///
    /// Fails with `NotFound` unless both records exist and are linked.
    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn get_one_from(&self, root_id: EntityId, extension_id: EntityId) -> Result<U> {
        self.require_root(root_id).await?;
        let value = self.require_extension(extension_id).await?;

        if !self.index.contains(root_id, extension_id).await? {
            return Err(RepositoryError::NotFound {
                domain: U::NAME,
                id: extension_id,
            });
        }
        Ok(value)
    }

    /// Lists extension records linked to `root_id` and matching `criteria`.
    ///
    /// The intersection is sorted by the extension's natural order (identity
    /// breaks ties) before `skip` and `limit` are applied.
    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn get_by_from(
        &self,
        root_id: EntityId,
        criteria: &Criteria,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Entry<U>>> {
        self.require_root(root_id).await?;

        let linked = self.index.linked(root_id).await?;
        if linked.is_empty() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<Entry<U>> = self
            .extensions
            .get_all(criteria)
            .await?
            .into_iter()
            .filter(|(id, _)| linked.contains(id))
            .map(Entry::from)
            .collect();

        entries.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.id.cmp(&b.id)));

        Ok(entries.into_iter().skip(skip).take(limit).collect())
    }

    /// Number of existing extension records linked to `root_id`.
    pub async fn linked_count(&self, root_id: EntityId) -> Result<usize> {
        Ok(self
            .get_by_from(root_id, &Criteria::any(), 0, usize::MAX)
            .await?
            .len())
    }

    async fn require_root(&self, id: EntityId) -> Result<()> {
        if self.roots.exists(id).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound {
                domain: T::NAME,
                id,
            })
        }
    }

    async fn require_extension(&self, id: EntityId) -> Result<U> {
        self.extensions
            .get_one(id)
            .await?
            .map(|entry| entry.value)
            .ok_or(RepositoryError::NotFound {
                domain: U::NAME,
                id,
            })
    }
}
