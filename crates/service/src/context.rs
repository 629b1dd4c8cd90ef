//! Process-wide wiring of stores, caches and services.

use std::time::Duration;

use cache::{CachePolicy, CacheRegistry};
use domain::{Domain, Group};
use repository::{AggregationRepository, CachedRepository};
use sqlx::postgres::PgPoolOptions;
use store::{StoreError, StoreRegistry, run_migrations};

use crate::{AggregateService, Config, Result, Service};

/// Cache policy for [`Group`]: one-minute sliding window, at most 100,000 entries.
pub fn group_cache_policy() -> CachePolicy {
    CachePolicy::expire_after_access(Duration::from_secs(60)).with_max_entries(100_000)
}

/// Owns the configuration and the store and cache registries.
///
/// Build one at start-up and hand out services from it; every service for the
/// same domain shares one store and one cache.
pub struct AppContext {
    config: Config,
    stores: StoreRegistry,
    caches: CacheRegistry,
}

impl AppContext {
    /// Creates a context backed by in-memory stores.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_stores(config, StoreRegistry::in_memory())
    }

    /// Creates a context from `config`.
    ///
    /// Connects to PostgreSQL and runs migrations when `database_url` is set,
    /// otherwise falls back to in-memory stores.
    pub async fn connect(config: Config) -> Result<Self> {
        let Some(url) = config.database_url.clone() else {
            tracing::info!("no database configured, using in-memory stores");
            return Self::in_memory(config);
        };

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&url)
            .await
            .map_err(StoreError::from)?;
        run_migrations(&pool).await?;
        tracing::info!(
            max_connections = config.database_max_connections,
            "connected to PostgreSQL"
        );

        Self::with_stores(config, StoreRegistry::postgres(pool))
    }

    /// Creates a context over an existing store registry.
    pub fn with_stores(config: Config, stores: StoreRegistry) -> Result<Self> {
        let caches = CacheRegistry::new(config.default_cache_policy());
        caches.register::<Group>(group_cache_policy())?;

        Ok(Self {
            config,
            stores,
            caches,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    pub fn caches(&self) -> &CacheRegistry {
        &self.caches
    }

    /// Fixes the cache policy of `D`. Fails once `D`'s cache exists.
    pub fn register_cache_policy<D: Domain>(&self, policy: CachePolicy) -> Result<()> {
        Ok(self.caches.register::<D>(policy)?)
    }

    pub fn repository<D: Domain>(&self) -> Result<CachedRepository<D>> {
        Ok(CachedRepository::new(
            self.stores.store::<D>()?,
            self.caches.from::<D>()?,
        ))
    }

    pub fn service<D: Domain>(&self) -> Result<Service<D>> {
        Ok(Service::new(
            self.repository::<D>()?,
            self.config.page_default_limit,
        ))
    }

    pub fn aggregate_service<T: Domain, U: Domain>(&self) -> Result<AggregateService<T, U>> {
        let repository = AggregationRepository::new(
            self.stores.store::<T>()?,
            self.stores.store::<U>()?,
            self.stores.join_index::<T, U>(),
        );
        Ok(AggregateService::new(
            repository,
            self.config.page_default_limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cache::Expiry;
    use domain::User;

    use super::*;

    #[test]
    fn group_policy_is_registered() {
        let context = AppContext::in_memory(Config::default()).unwrap();

        let policy = context.caches().policy_for::<Group>();
        assert_eq!(policy, group_cache_policy());
        assert!(policy.expiry.is_sliding());
    }

    #[test]
    fn other_domains_use_the_configured_ttl() {
        let config = Config {
            cache_ttl: Duration::from_secs(10),
            ..Config::default()
        };
        let context = AppContext::in_memory(config).unwrap();

        assert_eq!(
            context.caches().policy_for::<User>().expiry,
            Expiry::AfterWrite(Duration::from_secs(10))
        );
    }

    #[test]
    fn services_share_store_and_cache() {
        let context = AppContext::in_memory(Config::default()).unwrap();

        let a = context.repository::<User>().unwrap();
        let b = context.repository::<User>().unwrap();

        assert!(Arc::ptr_eq(a.store(), b.store()));
        assert!(Arc::ptr_eq(a.cache(), b.cache()));
    }

    #[test]
    fn policy_cannot_change_after_first_use() {
        let context = AppContext::in_memory(Config::default()).unwrap();
        context.service::<User>().unwrap();

        let err = context
            .register_cache_policy::<User>(CachePolicy::default())
            .unwrap_err();
        assert!(matches!(err, crate::ServiceError::Internal(_)));
    }

    #[tokio::test]
    async fn connect_without_database_is_in_memory() {
        let context = AppContext::connect(Config::default()).await.unwrap();
        assert!(matches!(context.stores().backend(), store::Backend::Memory));
    }
}
