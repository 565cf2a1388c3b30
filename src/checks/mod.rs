//! Referential Integrity Checks
//!
//! The schema can say that a field holds a zone id, but not that the zone exists.
//! These checks fill that gap. Each relationship is a [`CheckDefinition`]: the paths
//! that define the universe of valid ids and the paths whose values must belong to it.
//! One generic checker, [`check_references`], runs them all.
//!
//! ## Checks
//! - six dangling-reference relationships (see [`Association`])
//! - id uniqueness inside every list of every ruleset model description
//!   ([`check_unique_ids`])
//!
//! Checks never fail and never mutate the document. An empty result means the
//! relationship holds.

pub mod associations;
pub mod unique;

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ValidatorError};
use crate::jsonpath::{evaluate_all, PathExpression};

pub use associations::{
    check_fluid_loop_association, check_fluid_loop_or_piping_association, check_hvac_association,
    check_schedule_association, check_service_water_heating_association, check_zone_association,
    Association,
};
pub use unique::check_unique_ids;

/// A declared relationship between id-bearing objects and the fields that reference them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckDefinition {
    name: String,
    primary_paths: Vec<PathExpression>,
    reference_paths: Vec<PathExpression>,
}

impl CheckDefinition {
    /// Parse a definition from expression text
    ///
    /// `primary_paths` may be empty (every reference then dangles); `reference_paths`
    /// may not.
    pub fn new<S: AsRef<str>>(
        name: impl Into<String>,
        primary_paths: &[S],
        reference_paths: &[S],
    ) -> Result<Self> {
        let name = name.into();
        if reference_paths.is_empty() {
            return Err(ValidatorError::InvalidCheck(format!(
                "check '{}' declares no reference paths",
                name
            )));
        }

        Ok(Self {
            name,
            primary_paths: parse_all(primary_paths)?,
            reference_paths: parse_all(reference_paths)?,
        })
    }

    /// Name of the relationship
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Paths to the valid ids
    pub fn primary_paths(&self) -> &[PathExpression] {
        &self.primary_paths
    }

    /// Paths to the referencing values, in declaration order
    pub fn reference_paths(&self) -> &[PathExpression] {
        &self.reference_paths
    }

    /// Run this definition against a document
    pub fn check<'a>(&self, document: &'a Value) -> Vec<&'a Value> {
        check_references(self, document)
    }
}

fn parse_all<S: AsRef<str>>(paths: &[S]) -> Result<Vec<PathExpression>> {
    paths.iter().map(|p| p.as_ref().parse()).collect()
}

/// Every referenced value that is not among the definition's primary ids
///
/// Order and duplicates of the references are kept: a missing id referenced three
/// times is reported three times.
pub fn check_references<'a>(definition: &CheckDefinition, document: &'a Value) -> Vec<&'a Value> {
    let primary_ids = IdSet::from_values(evaluate_all(&definition.primary_paths, document));
    let referenced = evaluate_all(&definition.reference_paths, document);

    let dangling: Vec<&Value> = referenced
        .into_iter()
        .filter(|value| !primary_ids.contains(value))
        .collect();

    debug!(
        check = definition.name(),
        known_ids = primary_ids.len(),
        dangling = dangling.len(),
        "reference check complete"
    );
    dangling
}

/// Set of ids compared by JSON value
///
/// `serde_json::Value` is not `Hash`, so members are keyed by a canonical text form.
/// Numbers compare by numeric value (`1` and `1.0` are the same id) while strings never
/// equal numbers (`"1"` is not `1`). Object keys are kept sorted by `serde_json`.
#[derive(Debug, Default)]
pub(crate) struct IdSet {
    keys: HashSet<String>,
}

impl IdSet {
    pub(crate) fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        Self {
            keys: values.into_iter().map(id_key).collect(),
        }
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        self.keys.contains(&id_key(value))
    }

    /// Insert a value, returning false if it was already present
    pub(crate) fn insert(&mut self, value: &Value) -> bool {
        self.keys.insert(id_key(value))
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }
}

fn id_key(value: &Value) -> String {
    match value {
        Value::Number(number) => number_key(number),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(id_key).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}:{}", Value::from(key.as_str()), id_key(value)))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        other => other.to_string(),
    }
}

// Integral floats print without a fraction, so 1.0 keys like 1
fn number_key(number: &serde_json::Number) -> String {
    if let Some(n) = number.as_i64() {
        n.to_string()
    } else if let Some(n) = number.as_u64() {
        n.to_string()
    } else {
        match number.as_f64() {
            Some(f) if f == 0.0 => "0".to_string(),
            Some(f) => f.to_string(),
            None => number.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dangling_references_keep_order_and_duplicates() {
        let doc = json!({
            "things": [{"id": "A"}, {"id": "B"}],
            "refs": [{"to": "A"}, {"to": "C"}, {"to": "C"}]
        });
        let def = CheckDefinition::new("things", &["$.things[*].id"], &["$.refs[*].to"]).unwrap();
        assert_eq!(def.check(&doc), vec![&json!("C"), &json!("C")]);
    }

    #[test]
    fn test_references_from_several_paths() {
        let doc = json!({
            "things": [{"id": "A"}],
            "left": {"to": "X"},
            "right": [{"to": "A"}, {"to": "Y"}]
        });
        let def = CheckDefinition::new(
            "things",
            &["$.things[*].id"],
            &["$.right[*].to", "$.left.to"],
        )
        .unwrap();
        assert_eq!(def.check(&doc), vec![&json!("Y"), &json!("X")]);
    }

    #[test]
    fn test_no_primary_paths_means_everything_dangles() {
        let doc = json!({"refs": [1, 2]});
        let def = CheckDefinition::new("orphans", &[] as &[&str], &["$.refs[*]"]).unwrap();
        assert_eq!(def.check(&doc).len(), 2);
    }

    #[test]
    fn test_definition_requires_reference_paths() {
        let err = CheckDefinition::new("empty", &["$.a[*].id"], &[]).unwrap_err();
        assert!(matches!(err, ValidatorError::InvalidCheck(_)));
    }

    #[test]
    fn test_definition_rejects_malformed_paths() {
        let err = CheckDefinition::new("bad", &["$.a[0].id"], &["$.b"]).unwrap_err();
        assert!(matches!(err, ValidatorError::MalformedExpression { .. }));
    }

    #[test]
    fn test_id_set_distinguishes_types() {
        let ids = IdSet::from_values([&json!("1"), &json!({"b": 1, "a": 2})]);
        assert!(ids.contains(&json!("1")));
        assert!(!ids.contains(&json!(1)));
        assert!(ids.contains(&json!({"a": 2, "b": 1})));
    }

    #[test]
    fn test_id_set_compares_numbers_by_value() {
        let ids = IdSet::from_values([&json!(1), &json!(2.5), &json!([3.0])]);
        assert!(ids.contains(&json!(1.0)));
        assert!(ids.contains(&json!(2.5)));
        assert!(ids.contains(&json!([3])));
        assert!(!ids.contains(&json!(2)));
        assert!(!ids.contains(&json!("1")));

        let mut seen = IdSet::default();
        assert!(seen.insert(&json!(0)));
        assert!(!seen.insert(&json!(-0.0)));
    }

    #[test]
    fn test_integral_float_reference_resolves() {
        let doc = json!({"things": [{"id": 7}], "refs": [{"to": 7.0}, {"to": 8}]});
        let def = CheckDefinition::new("things", &["$.things[*].id"], &["$.refs[*].to"]).unwrap();
        assert_eq!(def.check(&doc), vec![&json!(8)]);
    }
}
