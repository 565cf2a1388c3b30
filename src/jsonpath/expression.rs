//! Path expressions
//!
//! A restricted JSONPath dialect: a root marker `$` followed by field steps (`.name`)
//! and array wildcards (`[*]`). A field whose name contains `.`, `[` or `]` is written
//! as a quoted bracket step (`['a.b']`, with `\'` and `\\` escapes). Nothing else is
//! accepted, so a parsed expression can always be evaluated against any document
//! without failing.
//!
//! ```text
//! $.ruleset_model_descriptions[*].buildings[*].id
//! ruleset_model_descriptions[*].schedules        (leading `$.` is optional)
//! $.extensions['ashrae.note']
//! ```

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{Result, ValidatorError};

/// One step of a path expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    /// Select the named child of an object
    Field(String),
    /// Select every element of an array
    Wildcard,
}

/// A parsed path expression
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathExpression {
    steps: Vec<Step>,
}

impl PathExpression {
    /// The expression selecting the document root (`$`)
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the textual form
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(ValidatorError::malformed(text, "expression is empty"));
        }

        // `a.b` is shorthand for `$.a.b`
        let (mut rest, mut expect_field) = match text.strip_prefix('$') {
            Some(body) => (body, false),
            None if text.starts_with('[') => (text, false),
            None => (text, true),
        };

        let mut steps = Vec::new();
        while expect_field || !rest.is_empty() {
            if expect_field {
                let end = rest
                    .find(|c: char| matches!(c, '.' | '[' | ']'))
                    .unwrap_or(rest.len());
                let name = &rest[..end];
                if name.is_empty() {
                    return Err(ValidatorError::malformed(text, "empty field name"));
                }
                steps.push(Step::Field(name.to_string()));
                rest = &rest[end..];
                expect_field = false;
            } else if let Some(after_dot) = rest.strip_prefix('.') {
                rest = after_dot;
                expect_field = true;
            } else if let Some(after_bracket) = rest.strip_prefix('[') {
                if let Some(quoted) = after_bracket.strip_prefix('\'') {
                    let (name, after) = parse_quoted_field(text, quoted)?;
                    steps.push(Step::Field(name));
                    rest = after;
                    continue;
                }
                let close = after_bracket
                    .find(']')
                    .ok_or_else(|| ValidatorError::malformed(text, "unterminated '['"))?;
                let selector = &after_bracket[..close];
                if selector != "*" {
                    return Err(ValidatorError::malformed(
                        text,
                        format!("unsupported selector '[{}]', only '[*]' is allowed", selector),
                    ));
                }
                steps.push(Step::Wildcard);
                rest = &after_bracket[close + 1..];
            } else {
                let unexpected = rest.chars().next().unwrap_or_default();
                return Err(ValidatorError::malformed(
                    text,
                    format!("unexpected character '{}'", unexpected),
                ));
            }
        }

        Ok(Self { steps })
    }

    /// The steps of this expression, root first
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// True for the root expression `$`
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Append a field step
    pub fn push_field(&mut self, name: impl Into<String>) {
        self.steps.push(Step::Field(name.into()));
    }

    /// Append a wildcard step
    pub fn push_wildcard(&mut self) {
        self.steps.push(Step::Wildcard);
    }

    /// Remove and return the last step
    pub fn pop(&mut self) -> Option<Step> {
        self.steps.pop()
    }

    /// A copy of this expression with a field step appended
    pub fn field(&self, name: impl Into<String>) -> Self {
        let mut extended = self.clone();
        extended.push_field(name);
        extended
    }

    /// A copy of this expression with a wildcard step appended
    pub fn wildcard(&self) -> Self {
        let mut extended = self.clone();
        extended.push_wildcard();
        extended
    }

    /// Render the steps without the leading `$`, e.g. `.buildings[*].id`
    pub fn relative(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            match step {
                Step::Field(name) if needs_brackets(name) => {
                    out.push_str("['");
                    for c in name.chars() {
                        if matches!(c, '\'' | '\\') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push_str("']");
                }
                Step::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                Step::Wildcard => out.push_str("[*]"),
            }
        }
        out
    }

    /// Evaluate against a document, returning every matched node in document order
    ///
    /// A field step on a non-object (or an object without that field) and a wildcard
    /// on a non-array simply contribute nothing for that branch.
    pub fn evaluate<'a>(&self, document: &'a Value) -> Vec<&'a Value> {
        let mut current = vec![document];

        for step in &self.steps {
            let mut next = Vec::with_capacity(current.len());
            for node in current {
                match (step, node) {
                    (Step::Field(name), Value::Object(map)) => next.extend(map.get(name)),
                    (Step::Wildcard, Value::Array(items)) => next.extend(items.iter()),
                    _ => {}
                }
            }
            if next.is_empty() {
                return next;
            }
            current = next;
        }

        current
    }
}

/// Field names the dotted form cannot carry
fn needs_brackets(name: &str) -> bool {
    name.is_empty() || name.chars().any(|c| matches!(c, '.' | '[' | ']'))
}

/// Read a quoted field name up to its closing `']`, returning the name and the rest
fn parse_quoted_field<'t>(text: &str, quoted: &'t str) -> Result<(String, &'t str)> {
    let mut name = String::new();
    let mut chars = quoted.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, escaped)) => name.push(escaped),
                None => break,
            },
            '\'' => {
                return quoted[i + 1..]
                    .strip_prefix(']')
                    .map(|after| (name, after))
                    .ok_or_else(|| {
                        ValidatorError::malformed(text, "expected ']' after quoted field name")
                    });
            }
            _ => name.push(c),
        }
    }
    Err(ValidatorError::malformed(text, "unterminated quoted field name"))
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.relative())
    }
}

impl FromStr for PathExpression {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
