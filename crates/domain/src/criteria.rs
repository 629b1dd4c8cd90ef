//! Criteria-by-example.
//!
//! A [`Criteria`] is a partial domain value: the set of fields whose value in
//! an example differs from the domain's [`Default`]. A record matches when
//! every constrained field is equal to the record's field. Only equality and
//! logical AND are supported.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CriteriaError;
use crate::model::Domain;

/// Equality constraints over the top-level fields of a domain value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    fields: Map<String, Value>,
}

impl Criteria {
    /// Criteria that match every record.
    pub fn any() -> Self {
        Self::default()
    }

    /// Builds criteria from the non-default fields of `example`.
    pub fn example<D: Domain>(example: &D) -> Result<Self, CriteriaError> {
        let baseline = to_object::<D>(&D::default())?;
        let fields = to_object::<D>(example)?
            .into_iter()
            .filter(|(name, value)| baseline.get(name) != Some(value))
            .collect();
        Ok(Self { fields })
    }

    /// Adds an equality constraint on a single field.
    pub fn field(mut self, name: impl Into<String>, value: impl Serialize) -> Result<Self, CriteriaError> {
        self.fields.insert(name.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    /// Returns true if no field is constrained.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of constrained fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Constrained fields and their required values.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// JSON object holding the constrained fields.
    ///
    /// Suitable for JSONB containment queries.
    pub fn to_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Returns true if the serialized record satisfies every constraint.
    pub fn matches_json(&self, record: &Value) -> bool {
        match record.as_object() {
            Some(object) => self
                .fields
                .iter()
                .all(|(name, expected)| object.get(name) == Some(expected)),
            None => self.is_empty(),
        }
    }

    /// Serializes `record` and checks it against every constraint.
    pub fn matches<T: Serialize>(&self, record: &T) -> Result<bool, CriteriaError> {
        if self.is_empty() {
            return Ok(true);
        }
        Ok(self.matches_json(&serde_json::to_value(record)?))
    }
}

fn to_object<D: Domain>(value: &D) -> Result<Map<String, Value>, CriteriaError> {
    match serde_json::to_value(value)? {
        Value::Object(object) => Ok(object),
        _ => Err(CriteriaError::NotAnObject { domain: D::NAME }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::User;

    #[test]
    fn default_example_matches_everything() {
        let criteria = Criteria::example(&User::default()).unwrap();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&User::new("ada", "ada@example.com", 36)).unwrap());
    }

    #[test]
    fn example_keeps_only_non_default_fields() {
        let example = User {
            age: 36,
            ..User::default()
        };
        let criteria = Criteria::example(&example).unwrap();
        assert_eq!(criteria.len(), 1);
        assert_eq!(criteria.fields().get("age"), Some(&serde_json::json!(36)));
    }

    #[test]
    fn all_constrained_fields_must_be_equal() {
        let example = User {
            name: "ada".to_string(),
            age: 36,
            ..User::default()
        };
        let criteria = Criteria::example(&example).unwrap();

        assert!(criteria.matches(&User::new("ada", "ada@example.com", 36)).unwrap());
        assert!(!criteria.matches(&User::new("ada", "ada@example.com", 37)).unwrap());
        assert!(!criteria.matches(&User::new("grace", "ada@example.com", 36)).unwrap());
    }

    #[test]
    fn explicit_field_constraint() {
        let criteria = Criteria::any().field("email", "grace@example.com").unwrap();
        assert!(criteria.matches(&User::new("grace", "grace@example.com", 85)).unwrap());
        assert!(!criteria.matches(&User::new("grace", "other@example.com", 85)).unwrap());
    }

    #[test]
    fn non_object_records_only_match_empty_criteria() {
        assert!(Criteria::any().matches_json(&serde_json::json!(3)));
        let criteria = Criteria::any().field("age", 3).unwrap();
        assert!(!criteria.matches_json(&serde_json::json!(3)));
    }

    #[test]
    fn to_json_is_an_object_of_constraints() {
        let criteria = Criteria::any().field("age", 3).unwrap();
        assert_eq!(criteria.to_json(), serde_json::json!({ "age": 3 }));
    }
}
