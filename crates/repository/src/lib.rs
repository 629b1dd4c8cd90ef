//! Repositories over per-domain stores.
//!
//! - [`CachedRepository`]: validated writes and cache-aside reads for one
//!   domain
//! - [`AggregationRepository`]: many-to-many links between a root domain and
//!   an extension domain

pub mod aggregation;
pub mod cached;
pub mod error;

pub use aggregation::AggregationRepository;
pub use cached::CachedRepository;
pub use error::{RepositoryError, Result};
