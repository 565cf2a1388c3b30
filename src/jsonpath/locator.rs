//! Error location helpers
//!
//! The structural validator reports where a document failed as a concrete traversal:
//! a list of object keys and array indices. These helpers turn that traversal into a
//! generalized expression for the message, and find the `id` of the nearest enclosing
//! object so the message can name the offending component.

use std::fmt;

use serde_json::Value;

use super::expression::PathExpression;

/// One step of a concrete traversal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TraversalKey {
    /// Object key
    Field(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for TraversalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalKey::Field(name) => write!(f, "{}", name),
            TraversalKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for TraversalKey {
    fn from(name: &str) -> Self {
        TraversalKey::Field(name.to_string())
    }
}

impl From<String> for TraversalKey {
    fn from(name: String) -> Self {
        TraversalKey::Field(name)
    }
}

impl From<usize> for TraversalKey {
    fn from(index: usize) -> Self {
        TraversalKey::Index(index)
    }
}

/// Render a concrete traversal as a generalized expression
///
/// Indices become `[*]`: the message reports the kind of place that failed, the
/// parent id pins down the instance. Keys the dotted form cannot carry are rendered as
/// quoted bracket steps, so the text always parses back to the same expression.
pub fn to_expression(path: &[TraversalKey]) -> PathExpression {
    let mut expr = PathExpression::root();
    for key in path {
        match key {
            TraversalKey::Field(name) => expr.push_field(name.as_str()),
            TraversalKey::Index(_) => expr.push_wildcard(),
        }
    }
    expr
}

/// Expression for the `id` of the deepest object along `path` that has one
///
/// The root itself is never considered, so an empty traversal yields `None`.
pub fn to_nearest_id_expression(path: &[TraversalKey], document: &Value) -> Option<PathExpression> {
    nearest_id_depth(path, document).map(|depth| to_expression(&path[..depth]).field("id"))
}

/// The `id` value of the deepest object along `path` that has one
pub fn nearest_id<'a>(path: &[TraversalKey], document: &'a Value) -> Option<&'a Value> {
    let depth = nearest_id_depth(path, document)?;
    resolve(&path[..depth], document)?.get("id")
}

fn nearest_id_depth(path: &[TraversalKey], document: &Value) -> Option<usize> {
    // nodes[i] is the node reached after the first i keys
    let mut nodes = Vec::with_capacity(path.len() + 1);
    nodes.push(document);
    let mut current = document;
    for key in path {
        match step(current, key) {
            Some(next) => {
                nodes.push(next);
                current = next;
            }
            None => break,
        }
    }

    (1..nodes.len())
        .rev()
        .find(|&depth| nodes[depth].as_object().map_or(false, |obj| obj.contains_key("id")))
}

fn resolve<'a>(path: &[TraversalKey], document: &'a Value) -> Option<&'a Value> {
    path.iter().try_fold(document, |node, key| step(node, key))
}

fn step<'a>(node: &'a Value, key: &TraversalKey) -> Option<&'a Value> {
    match (key, node) {
        (TraversalKey::Field(name), Value::Object(map)) => map.get(name),
        (TraversalKey::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}
