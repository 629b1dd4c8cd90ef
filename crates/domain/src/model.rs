//! Domain registration trait.

use std::fmt::Debug;

use serde::{Serialize, de::DeserializeOwned};

use crate::validation::Invariant;

/// A value type that can be persisted, cached and linked by the data-access layer.
///
/// Implementations register three things:
/// - a stable [`NAME`](Domain::NAME) used as the type token in registries,
///   storage tables and error messages
/// - the natural ordering, through [`Ord`], used for every listing
/// - the invariant set a value must satisfy before it is persisted
///
/// [`Default`] doubles as the "empty example" for criteria-by-example: a field
/// left at its default value does not constrain a query.
pub trait Domain:
    Clone + Debug + Ord + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Type token for this domain. Must be unique within a process.
    const NAME: &'static str;

    /// Returns the invariants every persisted value must satisfy, in the order
    /// they are evaluated and reported.
    fn invariants() -> Vec<Invariant<Self>>;
}
