//! Id uniqueness
//!
//! Every list in a ruleset model description holds objects that are referenced by
//! `id`, so ids must be unique within each kind of list. The lists are found without
//! any schema knowledge: discover every generalized list path, then compare the ids
//! found under `<path>[*].id`.

use serde_json::Value;
use tracing::debug;

use super::IdSet;
use crate::jsonpath::json_paths_to_lists;

/// Generalized paths of the lists that contain duplicate ids
///
/// Each `ruleset_model_descriptions` entry is checked on its own and a bad list is
/// reported once, qualified by the entry's index, e.g.
/// `ruleset_model_descriptions[0].buildings[*].building_segments`.
/// An empty result means all ids are unique.
pub fn check_unique_ids(document: &Value) -> Vec<String> {
    // ruleset_model_descriptions is optional in the schema
    let Some(descriptions) = document
        .get("ruleset_model_descriptions")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut bad_paths = Vec::new();
    for (index, description) in descriptions.iter().enumerate() {
        for list_path in json_paths_to_lists(description) {
            let ids = list_path.wildcard().field("id").evaluate(description);
            if has_duplicates(&ids) {
                bad_paths.push(format!(
                    "ruleset_model_descriptions[{}]{}",
                    index,
                    list_path.relative()
                ));
            }
        }
    }

    debug!(duplicate_lists = bad_paths.len(), "uniqueness check complete");
    bad_paths
}

fn has_duplicates(ids: &[&Value]) -> bool {
    let mut seen = IdSet::default();
    ids.iter().any(|id| !seen.insert(id))
}
