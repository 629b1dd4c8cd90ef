//! Per-domain query service.

use common::EntityId;
use domain::{Criteria, Domain};
use repository::CachedRepository;
use store::Entry;

use crate::{Page, Result, ServiceError};

/// Parses a textual identity, rejecting malformed input as an illegal argument.
pub fn parse_id(raw: &str) -> Result<EntityId> {
    Ok(EntityId::parse(raw)?)
}

/// CRUD and paginated queries for one domain.
///
/// Absence is reported as `NotFound` and list results come back in the
/// domain's natural order, identity breaking ties.
#[derive(Clone)]
pub struct Service<D: Domain> {
    repository: CachedRepository<D>,
    default_limit: usize,
}

impl<D: Domain> Service<D> {
    pub fn new(repository: CachedRepository<D>, default_limit: usize) -> Self {
        Self {
            repository,
            default_limit,
        }
    }

    pub fn repository(&self) -> &CachedRepository<D> {
        &self.repository
    }

    #[tracing::instrument(skip(self), fields(domain = D::NAME))]
    pub async fn get_one(&self, id: EntityId) -> Result<D> {
        self.repository
            .get_one(id)
            .await?
            .ok_or(ServiceError::NotFound {
                domain: D::NAME,
                id,
            })
    }

    /// Lists records matching `criteria`.
    ///
    /// The full match set is ordered before the page window is applied.
    #[tracing::instrument(skip(self), fields(domain = D::NAME))]
    pub async fn get_by(
        &self,
        criteria: &Criteria,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Entry<D>>> {
        let page = Page::resolve(skip, limit, self.default_limit)?;

        let mut entries: Vec<Entry<D>> = self
            .repository
            .get_by(criteria, 0, usize::MAX)
            .await?
            .into_iter()
            .map(Entry::from)
            .collect();
        entries.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.id.cmp(&b.id)));

        Ok(page.apply(entries))
    }

    /// Lists records equal to `example` on every field it sets.
    pub async fn get_by_example(
        &self,
        example: &D,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Entry<D>>> {
        let criteria = Criteria::example(example)?;
        self.get_by(&criteria, skip, limit).await
    }

    #[tracing::instrument(skip(self, value), fields(domain = D::NAME))]
    pub async fn create(&self, value: D) -> Result<EntityId> {
        Ok(self.repository.create(value).await?)
    }

    #[tracing::instrument(skip(self, value), fields(domain = D::NAME))]
    pub async fn update(&self, id: EntityId, value: D) -> Result<()> {
        if self.repository.update(id, value).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound {
                domain: D::NAME,
                id,
            })
        }
    }

    #[tracing::instrument(skip(self), fields(domain = D::NAME))]
    pub async fn delete(&self, id: EntityId) -> Result<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound {
                domain: D::NAME,
                id,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_canonical_uuids() {
        let id = EntityId::new();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("").unwrap_err().is_illegal_argument());
        assert!(parse_id("12345").unwrap_err().is_illegal_argument());
    }
}
