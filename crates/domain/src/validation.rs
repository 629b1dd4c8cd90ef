//! Domain validation.
//!
//! A [`Validator`] evaluates an ordered list of named predicates against a
//! candidate value. Evaluation never short-circuits: every violated invariant
//! is reported, in declaration order.

use std::sync::Arc;

use crate::error::ValidationError;
use crate::model::Domain;

type Predicate<D> = dyn Fn(&D) -> bool + Send + Sync;

/// A named predicate over a domain value.
pub struct Invariant<D> {
    name: &'static str,
    predicate: Box<Predicate<D>>,
}

impl<D> Invariant<D> {
    /// Creates an invariant that holds when `predicate` returns true.
    pub fn new(name: &'static str, predicate: impl Fn(&D) -> bool + Send + Sync + 'static) -> Self {
        Self {
            name,
            predicate: Box::new(predicate),
        }
    }

    /// Returns the invariant name reported on violation.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns true if `value` satisfies this invariant.
    pub fn holds(&self, value: &D) -> bool {
        (self.predicate)(value)
    }
}

impl<D> std::fmt::Debug for Invariant<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invariant").field("name", &self.name).finish()
    }
}

/// Validates values of one domain type against its invariant set.
///
/// Cloning is cheap; the invariant list is shared.
pub struct Validator<D> {
    domain: &'static str,
    invariants: Arc<[Invariant<D>]>,
}

impl<D> Clone for Validator<D> {
    fn clone(&self) -> Self {
        Self {
            domain: self.domain,
            invariants: Arc::clone(&self.invariants),
        }
    }
}

impl<D: Domain> Validator<D> {
    /// Builds the validator registered by the domain type.
    pub fn for_domain() -> Self {
        Self::new(D::NAME, D::invariants())
    }
}

impl<D> Validator<D> {
    /// Creates a validator from an explicit invariant list.
    pub fn new(domain: &'static str, invariants: Vec<Invariant<D>>) -> Self {
        Self {
            domain,
            invariants: invariants.into(),
        }
    }

    /// Returns the names of all invariants, in evaluation order.
    pub fn invariant_names(&self) -> Vec<&'static str> {
        self.invariants.iter().map(Invariant::name).collect()
    }

    /// Returns the names of every invariant `value` violates.
    pub fn violations(&self, value: &D) -> Vec<&'static str> {
        self.invariants
            .iter()
            .filter(|invariant| !invariant.holds(value))
            .map(Invariant::name)
            .collect()
    }

    /// Checks `value` without taking ownership.
    pub fn check(&self, value: &D) -> Result<(), ValidationError> {
        let violations = self.violations(value);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                domain: self.domain,
                violations,
            })
        }
    }

    /// Returns `value` back if it satisfies every invariant.
    pub fn validate(&self, value: D) -> Result<D, ValidationError> {
        self.check(&value)?;
        Ok(value)
    }
}
