//! Domain error types.

use thiserror::Error;

/// A candidate value violated one or more invariants of its domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {domain}: violated {}", .violations.join(", "))]
pub struct ValidationError {
    /// Name of the domain the value belongs to.
    pub domain: &'static str,

    /// Every violated invariant name, in evaluation order.
    pub violations: Vec<&'static str>,
}

impl ValidationError {
    /// Returns true if the named invariant was violated.
    pub fn violates(&self, name: &str) -> bool {
        self.violations.contains(&name)
    }
}

/// Errors raised while building criteria from an example value.
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// The example does not serialize to a JSON object.
    #[error("Criteria example for {domain} must serialize to an object")]
    NotAnObject { domain: &'static str },

    /// The example could not be serialized.
    #[error("Criteria serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
