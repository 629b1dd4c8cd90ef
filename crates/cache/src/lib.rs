//! Per-domain caches.
//!
//! - [`Cache`]: identity-keyed cache with absolute or sliding expiry and an
//!   optional entry bound
//! - [`CachePolicy`]: expiry and capacity, fixed per domain at registration
//! - [`CacheRegistry`]: one cache per domain type, created lazily

pub mod cache;
pub mod error;
pub mod policy;
pub mod registry;

pub use cache::Cache;
pub use error::{CacheError, Result};
pub use policy::{CachePolicy, DEFAULT_TTL, Expiry};
pub use registry::CacheRegistry;
