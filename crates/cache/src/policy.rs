use std::num::NonZeroUsize;
use std::time::Duration;

use tokio::time::Instant;

/// Time-to-live applied when a domain registers no policy of its own.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// When a cache entry stops being served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Fixed lifetime counted from the last write.
    AfterWrite(Duration),
    /// Sliding lifetime counted from the last read or write.
    AfterAccess(Duration),
}

impl Expiry {
    /// Lifetime of an entry.
    pub fn ttl(&self) -> Duration {
        match self {
            Self::AfterWrite(ttl) | Self::AfterAccess(ttl) => *ttl,
        }
    }

    /// Returns true if reads extend the lifetime.
    pub fn is_sliding(&self) -> bool {
        matches!(self, Self::AfterAccess(_))
    }

    /// Returns true if an entry stamped at `stamp` is expired at `now`.
    pub fn is_expired(&self, stamp: Instant, now: Instant) -> bool {
        now.saturating_duration_since(stamp) >= self.ttl()
    }
}

/// Expiry and capacity of one domain's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub expiry: Expiry,
    /// Least-recently-used entries are evicted beyond this bound.
    pub max_entries: Option<NonZeroUsize>,
}

impl CachePolicy {
    /// Entries live `ttl` after being written, with no entry bound.
    pub fn expire_after_write(ttl: Duration) -> Self {
        Self {
            expiry: Expiry::AfterWrite(ttl),
            max_entries: None,
        }
    }

    /// Entries live `ttl` after being read or written, with no entry bound.
    pub fn expire_after_access(ttl: Duration) -> Self {
        Self {
            expiry: Expiry::AfterAccess(ttl),
            max_entries: None,
        }
    }

    /// Bounds the number of entries. Zero removes the bound.
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = NonZeroUsize::new(max_entries);
        self
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::expire_after_write(DEFAULT_TTL)
    }
}
