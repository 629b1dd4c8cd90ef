//! Group domain.

use serde::{Deserialize, Serialize};

use crate::model::Domain;
use crate::validation::Invariant;

/// Longest accepted group name, in characters.
pub const MAX_GROUP_NAME_LEN: usize = 64;

/// Longest accepted group description, in characters.
pub const MAX_GROUP_DESCRIPTION_LEN: usize = 512;

/// A named collection users can be linked to.
///
/// Groups are ordered by name, then description.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub description: String,
}

impl Group {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl Domain for Group {
    const NAME: &'static str = "group";

    fn invariants() -> Vec<Invariant<Self>> {
        vec![
            Invariant::new("name_not_blank", |g: &Group| !g.name.trim().is_empty()),
            Invariant::new("name_within_length", |g: &Group| {
                g.name.chars().count() <= MAX_GROUP_NAME_LEN
            }),
            Invariant::new("description_within_length", |g: &Group| {
                g.description.chars().count() <= MAX_GROUP_DESCRIPTION_LEN
            }),
        ]
    }
}
