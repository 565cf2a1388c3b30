//! Path Expression Engine
//!
//! Evaluates the restricted JSONPath dialect against plain JSON documents.
//!
//! ## Modules
//! - `expression`: the dialect itself (parsing, rendering, evaluation)
//! - `locator`: turns concrete error locations into expressions
//! - `discover`: enumerates every generalized path that leads to a list
//!
//! Lookups that find nothing are not errors. Optional fields are the norm in RPD
//! documents, so a missing field or a wildcard over a non-array just yields no values.

pub mod discover;
pub mod expression;
pub mod locator;

use serde_json::Value;

use crate::error::Result;

pub use discover::json_paths_to_lists;
pub use expression::{PathExpression, Step};
pub use locator::{nearest_id, to_expression, to_nearest_id_expression, TraversalKey};

/// Find every value matched by `expression` in `document`
///
/// Fails only when the expression text is malformed.
pub fn find_all<'a>(expression: &str, document: &'a Value) -> Result<Vec<&'a Value>> {
    let expr = PathExpression::parse(expression)?;
    Ok(expr.evaluate(document))
}

/// Run several expressions and concatenate their matches in the order given
///
/// Every expression is parsed before the document is touched, so a malformed entry
/// fails the whole call without partial results.
pub fn find_all_by_jsonpaths<'a, S: AsRef<str>>(
    expressions: &[S],
    document: &'a Value,
) -> Result<Vec<&'a Value>> {
    let parsed = expressions
        .iter()
        .map(|e| PathExpression::parse(e.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(evaluate_all(&parsed, document))
}

/// Evaluate already-parsed expressions and concatenate their matches
pub fn evaluate_all<'a>(expressions: &[PathExpression], document: &'a Value) -> Vec<&'a Value> {
    expressions
        .iter()
        .flat_map(|expr| expr.evaluate(document))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "ruleset_model_descriptions": [
                {
                    "schedules": [{"id": "s1"}, {"id": "s2"}],
                    "fluid_loops": [{"id": "loop-1", "child_loops": [{"id": "child-1"}]}]
                },
                {
                    "schedules": [{"id": "s1"}]
                }
            ]
        })
    }

    #[test]
    fn test_find_all_collects_across_instances() {
        let doc = sample();
        let ids = find_all("$.ruleset_model_descriptions[*].schedules[*].id", &doc).unwrap();
        assert_eq!(ids, vec![&json!("s1"), &json!("s2"), &json!("s1")]);
    }

    #[test]
    fn test_find_all_is_deterministic() {
        let doc = sample();
        let expr = "$.ruleset_model_descriptions[*].schedules[*].id";
        assert_eq!(find_all(expr, &doc).unwrap(), find_all(expr, &doc).unwrap());
    }

    #[test]
    fn test_find_all_by_jsonpaths_concatenates_in_order() {
        let doc = sample();
        let first = "$.ruleset_model_descriptions[*].fluid_loops[*].child_loops[*].id";
        let second = "$.ruleset_model_descriptions[*].schedules[*].id";

        let combined = find_all_by_jsonpaths(&[first, second], &doc).unwrap();
        let mut expected = find_all(first, &doc).unwrap();
        expected.extend(find_all(second, &doc).unwrap());
        assert_eq!(combined, expected);

        // the same expression twice doubles the output
        let doubled = find_all_by_jsonpaths(&[second, second], &doc).unwrap();
        assert_eq!(doubled.len(), 6);
    }

    #[test]
    fn test_find_all_by_jsonpaths_fails_before_evaluating() {
        let doc = sample();
        let result = find_all_by_jsonpaths(&["$.ruleset_model_descriptions[*]", "$.x[1]"], &doc);
        assert!(result.is_err());
    }
}
