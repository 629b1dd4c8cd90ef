//! User domain.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::model::Domain;
use crate::validation::Invariant;

/// Oldest accepted age, in years.
pub const MAX_USER_AGE: u32 = 150;

/// A registered user.
///
/// Users are ordered by age, then name, then email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: u32) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age,
        }
    }
}

impl Ord for User {
    fn cmp(&self, other: &Self) -> Ordering {
        self.age
            .cmp(&other.age)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.email.cmp(&other.email))
    }
}

impl PartialOrd for User {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Domain for User {
    const NAME: &'static str = "user";

    fn invariants() -> Vec<Invariant<Self>> {
        vec![
            Invariant::new("name_not_blank", |u: &User| !u.name.trim().is_empty()),
            Invariant::new("email_has_at_sign", |u: &User| {
                u.email
                    .split_once('@')
                    .is_some_and(|(local, host)| !local.is_empty() && !host.is_empty())
            }),
            Invariant::new("age_within_bounds", |u: &User| u.age <= MAX_USER_AGE),
        ]
    }
}
