//! Type-tagged cache registry.
//!
//! Policies are registered per domain at start-up. The cache for a domain is
//! created on first request with the policy registered for it (or the
//! registry default) and the same instance is returned afterwards.

use std::any::Any;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use domain::Domain;

use crate::{Cache, CacheError, CachePolicy, Result};

/// Registry of per-domain caches.
pub struct CacheRegistry {
    default_policy: CachePolicy,
    policies: DashMap<&'static str, CachePolicy>,
    caches: DashMap<&'static str, Arc<dyn Any + Send + Sync>>,
}

impl CacheRegistry {
    /// Creates a registry whose unregistered domains use `default_policy`.
    pub fn new(default_policy: CachePolicy) -> Self {
        Self {
            default_policy,
            policies: DashMap::new(),
            caches: DashMap::new(),
        }
    }

    /// Fixes the policy for domain `D`.
    ///
    /// Fails once the cache for `D` has been created.
    pub fn register<D: Domain>(&self, policy: CachePolicy) -> Result<()> {
        // Holding the vacant entry keeps `from` from creating the cache meanwhile
        match self.caches.entry(D::NAME) {
            Entry::Occupied(_) => Err(CacheError::AlreadyCreated { domain: D::NAME }),
            Entry::Vacant(_slot) => {
                tracing::debug!(domain = D::NAME, ?policy, "registered cache policy");
                self.policies.insert(D::NAME, policy);
                Ok(())
            }
        }
    }

    /// Returns the policy domain `D` is (or will be) cached with.
    pub fn policy_for<D: Domain>(&self) -> CachePolicy {
        self.policies
            .get(D::NAME)
            .map(|policy| *policy)
            .unwrap_or(self.default_policy)
    }

    /// Returns the cache for domain `D`, creating it on first use.
    pub fn from<D: Domain>(&self) -> Result<Arc<Cache<D>>> {
        let cache = match self.caches.entry(D::NAME) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                let policy = self.policy_for::<D>();
                tracing::debug!(domain = D::NAME, ?policy, "creating cache");
                let cache = Arc::new(Cache::<D>::new(D::NAME, policy)) as Arc<dyn Any + Send + Sync>;
                entry.insert(cache.clone());
                cache
            }
        };

        cache
            .downcast::<Cache<D>>()
            .map_err(|_| CacheError::TypeMismatch { domain: D::NAME })
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use common::EntityId;
    use domain::{Group, Invariant, User};
    use serde::{Deserialize, Serialize};

    #[test]
    fn same_instance_is_returned_per_domain() {
        let registry = CacheRegistry::default();
        let id = EntityId::new();

        registry
            .from::<User>()
            .unwrap()
            .put(id, User::new("ada", "ada@example.com", 36));

        let again = registry.from::<User>().unwrap();
        assert!(again.contains(&id));
        assert!(registry.from::<Group>().unwrap().is_empty());
    }

    #[test]
    fn unregistered_domains_use_the_default_policy() {
        let default = CachePolicy::expire_after_write(Duration::from_secs(42));
        let registry = CacheRegistry::new(default);

        assert_eq!(registry.from::<User>().unwrap().policy(), default);
    }

    #[test]
    fn registered_policy_is_applied_on_creation() {
        let registry = CacheRegistry::default();
        let policy =
            CachePolicy::expire_after_access(Duration::from_secs(60)).with_max_entries(100_000);

        registry.register::<Group>(policy).unwrap();

        assert_eq!(registry.from::<Group>().unwrap().policy(), policy);
        assert_eq!(registry.from::<User>().unwrap().policy(), CachePolicy::default());
    }

    #[test]
    fn policy_is_fixed_after_creation() {
        let registry = CacheRegistry::default();
        registry.from::<User>().unwrap();

        let err = registry
            .register::<User>(CachePolicy::expire_after_access(Duration::from_secs(1)))
            .unwrap_err();
        assert!(matches!(err, CacheError::AlreadyCreated { domain: "user" }));
        assert_eq!(registry.policy_for::<User>(), CachePolicy::default());
    }

    #[test]
    fn registration_racing_creation_is_all_or_nothing() {
        let policy = CachePolicy::expire_after_access(Duration::from_secs(60));

        for _ in 0..200 {
            let registry = Arc::new(CacheRegistry::default());
            let registering = {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.register::<User>(policy))
            };
            let creating = {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.from::<User>().unwrap().policy())
            };

            let registered = registering.join().unwrap();
            let created = creating.join().unwrap();

            if registered.is_ok() {
                assert_eq!(created, policy);
            } else {
                assert_eq!(created, CachePolicy::default());
            }
        }
    }

    #[test]
    fn concurrent_requests_share_one_cache() {
        let registry = Arc::new(CacheRegistry::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.from::<User>().unwrap())
            })
            .collect();
        let caches: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(caches.iter().all(|cache| Arc::ptr_eq(cache, &caches[0])));
    }

    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
    struct Impostor;

    impl Domain for Impostor {
        const NAME: &'static str = "group";

        fn invariants() -> Vec<Invariant<Self>> {
            vec![]
        }
    }

    #[test]
    fn name_collision_is_reported() {
        let registry = CacheRegistry::default();
        registry.from::<Group>().unwrap();

        let err = registry.from::<Impostor>().err().unwrap();
        assert!(matches!(err, CacheError::TypeMismatch { domain: "group" }));
    }
}
