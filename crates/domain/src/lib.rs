//! Domain layer for the data-access crates.
//!
//! This crate provides:
//! - the [`Domain`] registration trait (type token, ordering, invariants)
//! - [`Validator`] for non-short-circuit invariant checking
//! - [`Criteria`] for equality-by-example filtering
//! - the [`User`] and [`Group`] domains

pub mod criteria;
pub mod error;
pub mod group;
pub mod model;
pub mod user;
pub mod validation;

pub use criteria::Criteria;
pub use error::{CriteriaError, ValidationError};
pub use group::Group;
pub use model::Domain;
pub use user::User;
pub use validation::{Invariant, Validator};
