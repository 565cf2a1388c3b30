//! List path discovery
//!
//! Walks a document once and records the generalized path of every array in it.
//! Array elements are entered through a wildcard step, never an index, so all the
//! `terminals` arrays of all zones collapse into `...zones[*].terminals`.

use std::collections::BTreeSet;

use serde_json::Value;

use super::expression::PathExpression;

/// Every distinct generalized path leading to an array in `document`
///
/// The recorded path is the array itself; append `[*]` to reach its elements.
pub fn json_paths_to_lists(document: &Value) -> BTreeSet<PathExpression> {
    let mut paths = BTreeSet::new();
    let mut current = PathExpression::root();
    collect_list_paths(document, &mut current, &mut paths);
    paths
}

fn collect_list_paths(node: &Value, current: &mut PathExpression, paths: &mut BTreeSet<PathExpression>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                current.push_field(key.as_str());
                collect_list_paths(child, current, paths);
                current.pop();
            }
        }
        Value::Array(items) => {
            // most arrays repeat an already recorded shape; only clone new ones
            if !paths.contains(current) {
                paths.insert(current.clone());
            }
            current.push_wildcard();
            for item in items {
                collect_list_paths(item, current, paths);
            }
            current.pop();
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}
