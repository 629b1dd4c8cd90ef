use common::EntityId;
use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::policy::CachePolicy;

struct Slot<D> {
    value: D,
    stamp: Instant,
}

/// Identity-keyed cache for one domain type.
///
/// Expired entries are never served; they are dropped when next touched or
/// by [`purge_expired`](Cache::purge_expired). When the policy bounds the
/// entry count, the least recently used entry is evicted to make room.
pub struct Cache<D> {
    domain: &'static str,
    policy: CachePolicy,
    entries: Mutex<LruCache<EntityId, Slot<D>>>,
}

impl<D: Clone> Cache<D> {
    /// Creates an empty cache governed by `policy`.
    pub fn new(domain: &'static str, policy: CachePolicy) -> Self {
        let entries = match policy.max_entries {
            Some(max) => LruCache::new(max),
            None => LruCache::unbounded(),
        };
        Self {
            domain,
            policy,
            entries: Mutex::new(entries),
        }
    }

    /// Name of the domain this cache serves.
    pub fn domain(&self) -> &'static str {
        self.domain
    }

    /// Policy this cache was created with.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the live value for `id`.
    ///
    /// Under a sliding policy a hit restarts the entry's lifetime.
    pub fn get(&self, id: &EntityId) -> Option<D> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(id) {
            Some(slot) if !self.policy.expiry.is_expired(slot.stamp, now) => {
                if self.policy.expiry.is_sliding() {
                    slot.stamp = now;
                }
                return Some(slot.value.clone());
            }
            Some(_) => {}
            None => return None,
        }

        entries.pop(id);
        self.record_eviction();
        None
    }

    /// Returns true if a live entry exists, without refreshing it.
    pub fn contains(&self, id: &EntityId) -> bool {
        let now = Instant::now();
        self.entries
            .lock()
            .peek(id)
            .is_some_and(|slot| !self.policy.expiry.is_expired(slot.stamp, now))
    }

    /// Inserts or overwrites the entry for `id`.
    pub fn put(&self, id: EntityId, value: D) {
        let slot = Slot {
            value,
            stamp: Instant::now(),
        };
        let displaced = self.entries.lock().push(id, slot);

        if let Some((evicted, _)) = displaced
            && evicted != id
        {
            self.record_eviction();
        }
    }

    /// Overwrites the entry for `id` only if a live one exists.
    ///
    /// Returns false, leaving the cache without an entry for `id`, otherwise.
    pub fn replace(&self, id: EntityId, value: D) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(&id) {
            Some(slot) if !self.policy.expiry.is_expired(slot.stamp, now) => {
                slot.value = value;
                slot.stamp = now;
                return true;
            }
            Some(_) => {}
            None => return false,
        }

        entries.pop(&id);
        self.record_eviction();
        false
    }

    /// Removes the entry for `id`, returning its value if it was live.
    pub fn remove(&self, id: &EntityId) -> Option<D> {
        let now = Instant::now();
        self.entries
            .lock()
            .pop(id)
            .filter(|slot| !self.policy.expiry.is_expired(slot.stamp, now))
            .map(|slot| slot.value)
    }

    /// Drops every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired: Vec<EntityId> = entries
            .iter()
            .filter(|(_, slot)| self.policy.expiry.is_expired(slot.stamp, now))
            .map(|(id, _)| *id)
            .collect();

        for id in &expired {
            entries.pop(id);
        }
        if !expired.is_empty() {
            tracing::debug!(domain = self.domain, purged = expired.len(), "purged expired cache entries");
            metrics::counter!("cache_evictions_total", "domain" => self.domain)
                .increment(expired.len() as u64);
        }
        expired.len()
    }

    /// Number of held entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn record_eviction(&self) {
        metrics::counter!("cache_evictions_total", "domain" => self.domain).increment(1);
    }
}
