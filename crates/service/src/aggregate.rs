//! Service over a root/extension aggregation.

use common::EntityId;
use domain::{Criteria, Domain};
use repository::AggregationRepository;
use store::Entry;

use crate::{Page, Result};

/// Nested access to extension records of `U` reachable from roots of `T`.
#[derive(Clone)]
pub struct AggregateService<T: Domain, U: Domain> {
    repository: AggregationRepository<T, U>,
    default_limit: usize,
}

impl<T: Domain, U: Domain> AggregateService<T, U> {
    pub fn new(repository: AggregationRepository<T, U>, default_limit: usize) -> Self {
        Self {
            repository,
            default_limit,
        }
    }

    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn get_one_from(&self, root_id: EntityId, extension_id: EntityId) -> Result<U> {
        Ok(self.repository.get_one_from(root_id, extension_id).await?)
    }

    /// Lists linked extension records matching `criteria`, in natural order.
    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn get_by_from(
        &self,
        root_id: EntityId,
        criteria: &Criteria,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Entry<U>>> {
        let page = Page::resolve(skip, limit, self.default_limit)?;
        Ok(self
            .repository
            .get_by_from(root_id, criteria, page.skip, page.limit)
            .await?)
    }

    #[tracing::instrument(skip(self, value), fields(root = T::NAME, extension = U::NAME))]
    pub async fn create_on(&self, root_id: EntityId, value: U) -> Result<EntityId> {
        Ok(self.repository.create_on(root_id, value).await?)
    }

    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn link(&self, root_id: EntityId, extension_id: EntityId) -> Result<()> {
        Ok(self.repository.link(root_id, extension_id).await?)
    }

    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn unlink(&self, root_id: EntityId, extension_id: EntityId) -> Result<()> {
        Ok(self.repository.unlink(root_id, extension_id).await?)
    }

    #[tracing::instrument(skip(self), fields(root = T::NAME, extension = U::NAME))]
    pub async fn linked_count(&self, root_id: EntityId) -> Result<usize> {
        Ok(self.repository.linked_count(root_id).await?)
    }
}
