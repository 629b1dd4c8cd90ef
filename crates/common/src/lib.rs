//! Shared types used across the data-access crates.

pub mod types;

pub use types::{EntityId, ParseEntityIdError};
