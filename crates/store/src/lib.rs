//! Persistence stores for the data-access layer.
//!
//! - [`Store`]: identity-keyed record set for one domain type with
//!   equality-by-example filtering and pagination
//! - [`JoinIndex`]: adjacency between a root and an extension domain
//! - in-memory and PostgreSQL implementations of both
//! - [`StoreRegistry`]: one store per domain type, created on first use

pub mod error;
pub mod join;
pub mod memory;
pub mod postgres;
pub mod registry;
pub mod store;

pub use common::EntityId;
pub use error::{Result, StoreError};
pub use join::JoinIndex;
pub use memory::{InMemoryJoinIndex, InMemoryStore};
pub use postgres::{PostgresJoinIndex, PostgresStore, run_migrations};
pub use registry::{Backend, StoreRegistry};
pub use store::{Entries, Entry, Store, StoreExt};
