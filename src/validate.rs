//! RPD validation
//!
//! Combines the two halves of RPD validation into pass/fail reports:
//! - structural validation against a schema release ([`schema_validate`])
//! - referential integrity across the document ([`validate_references`])
//!
//! Reports carry one human-readable message per schema violation and one per failing
//! reference check. Formatting lives here so the path engine and checks stay free of
//! presentation concerns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::checks::{check_unique_ids, Association};
use crate::config::ReportConfig;
use crate::jsonpath::{nearest_id, to_expression};
use crate::schema::SchemaSet;

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when nothing was found
    pub passed: bool,
    /// Messages describing what failed, `None` when passed
    pub errors: Option<Vec<String>>,
}

impl ValidationReport {
    /// A passing report
    pub fn pass() -> Self {
        Self {
            passed: true,
            errors: None,
        }
    }

    /// A report that passes only if `errors` is empty
    pub fn from_errors(errors: Vec<String>) -> Self {
        if errors.is_empty() {
            Self::pass()
        } else {
            Self {
                passed: false,
                errors: Some(errors),
            }
        }
    }

    /// Error messages (empty when passed)
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }

    /// Combine two reports; the result passes only if both pass
    pub fn merge(self, other: ValidationReport) -> Self {
        let passed = self.passed && other.passed;
        let mut errors = self.errors.unwrap_or_default();
        errors.extend(other.errors.unwrap_or_default());
        Self {
            passed,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

/// Validate `rpd` against a schema release
///
/// Every violation becomes `"<message>. Path: <generalized path>."`, followed by
/// `" Parent ID: <id>"` when an enclosing object carries an id. A schema that cannot
/// be compiled yields a single `"Unexpected error: ..."` entry.
pub fn schema_validate(rpd: &Value, schemas: &SchemaSet, report: &ReportConfig) -> ValidationReport {
    let validator = match schemas.compile() {
        Ok(validator) => validator,
        Err(e) => {
            warn!(version = %schemas.version(), error = %e, "schema compilation failed");
            return ValidationReport::from_errors(vec![format!("Unexpected error: {}", e)]);
        }
    };

    let errors: Vec<String> = validator
        .violations(rpd)
        .into_iter()
        .map(|violation| {
            let message = if report.full_errors {
                violation.message
            } else {
                truncate_message(&violation.message, report)
            };
            let path = to_expression(&violation.location);
            let mut line = format!("{}. Path: {}.", message, path);
            if let Some(parent_id) = nearest_id(&violation.location, rpd).and_then(render_parent_id) {
                line.push_str(&format!(" Parent ID: {}", parent_id));
            }
            line
        })
        .collect();

    info!(
        version = %schemas.version(),
        violations = errors.len(),
        "schema validation complete"
    );
    ValidationReport::from_errors(errors)
}

/// Verify that every referenced object exists and that ids are unique
///
/// Runs the uniqueness check and then each [`Association`] in order, adding one
/// message per failing check.
pub fn validate_references(rpd: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    let bad_paths = check_unique_ids(rpd);
    if !bad_paths.is_empty() {
        errors.push(format!("Non-unique ids for paths: {}", bad_paths.join("; ")));
    }

    for association in Association::ALL {
        let missing = association.check(rpd);
        if !missing.is_empty() {
            errors.push(missing_reference_message(association, &missing));
        }
    }

    info!(failed_checks = errors.len(), "reference validation complete");
    ValidationReport::from_errors(errors)
}

/// Structural validation followed by reference validation
pub fn validate_rpd(rpd: &Value, schemas: &SchemaSet, report: &ReportConfig) -> ValidationReport {
    schema_validate(rpd, schemas, report).merge(validate_references(rpd))
}

/// Shorten long validator messages to their head and tail
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_message(message: &str, report: &ReportConfig) -> String {
    let length = message.chars().count();
    if length <= report.truncate_over {
        return message.to_string();
    }

    let head: String = message.chars().take(report.head_chars).collect();
    let tail: String = message
        .chars()
        .skip(length.saturating_sub(report.tail_chars))
        .collect();
    format!("{}..........{}", head, tail)
}

fn missing_reference_message(association: Association, missing: &[&Value]) -> String {
    let ids = Value::Array(missing.iter().map(|id| (*id).clone()).collect());
    match association {
        Association::Hvac => format!(
            "Cannot find HVAC systems {} in the HeatingVentilationAirConditioningSystems data group.",
            ids
        ),
        Association::Zone => format!("Cannot find zones {} in the Zone data group.", ids),
        Association::FluidLoop => {
            format!("Cannot find fluid loop {} in the FluidLoop data group.", ids)
        }
        Association::Schedule => {
            format!("Cannot find schedule {} in the Schedule data group.", ids)
        }
        Association::FluidLoopOrPiping => format!(
            "Cannot find piping {} in the FluidLoop or ServiceWaterHeatingDistributionSystems data group.",
            ids
        ),
        Association::ServiceWaterHeating => format!(
            "Cannot find service water heating {} in the ServiceWaterHeatingDistributionSystems data group.",
            ids
        ),
    }
}

fn render_parent_id(id: &Value) -> Option<String> {
    match id {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::SchemaVersion;
    use serde_json::json;

    fn zone_schema() -> SchemaSet {
        SchemaSet::new(
            SchemaVersion::parse("0.1.0").unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "zones": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "id": {"type": "string"},
                                "volume": {"type": "number"}
                            }
                        }
                    }
                }
            }),
        )
    }

    #[test]
    fn test_schema_validate_formats_path_and_parent() {
        let doc = json!({"zones": [{"id": "z1", "volume": 3.0}, {"id": "z2", "volume": "big"}]});
        let report = schema_validate(&doc, &zone_schema(), &ReportConfig::default());

        assert!(!report.passed);
        let errors = report.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains(". Path: $.zones[*].volume."));
        assert!(errors[0].ends_with(" Parent ID: z2"));
    }

    #[test]
    fn test_schema_validate_passes() {
        let doc = json!({"zones": [{"id": "z1", "volume": 3.0}]});
        assert_eq!(
            schema_validate(&doc, &zone_schema(), &ReportConfig::default()),
            ValidationReport::pass()
        );
    }

    #[test]
    fn test_uncompilable_schema_is_an_unexpected_error() {
        let schemas = SchemaSet::new(SchemaVersion::parse("0.1.0").unwrap(), json!({"type": 12}));
        let report = schema_validate(&json!({}), &schemas, &ReportConfig::default());
        assert!(!report.passed);
        assert!(report.errors()[0].starts_with("Unexpected error: "));
    }

    #[test]
    fn test_truncate_message() {
        let report = ReportConfig::default();
        let short = "x".repeat(160);
        assert_eq!(truncate_message(&short, &report), short);

        let long = format!("{}{}", "a".repeat(100), "b".repeat(100));
        let truncated = truncate_message(&long, &report);
        let expected = format!("{}..........{}{}", "a".repeat(20), "a".repeat(30), "b".repeat(100));
        assert_eq!(truncated, expected);
        assert_eq!(truncated.chars().count(), 20 + 10 + 130);
    }

    #[test]
    fn test_validate_references_one_message_per_check() {
        let doc = json!({
            "ruleset_model_descriptions": [{
                "schedules": [{"id": "s1"}, {"id": "s1"}],
                "fluid_loops": [{"id": "hw"}],
                "pumps": [{"id": "p1", "loop_or_piping": "pipe-9"}, {"id": "p2", "loop_or_piping": "pipe-9"}]
            }]
        });
        let report = validate_references(&doc);
        assert!(!report.passed);
        assert_eq!(
            report.errors(),
            &[
                "Non-unique ids for paths: ruleset_model_descriptions[0].schedules".to_string(),
                "Cannot find piping [\"pipe-9\",\"pipe-9\"] in the FluidLoop or ServiceWaterHeatingDistributionSystems data group."
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_merge_reports() {
        let failed = ValidationReport::from_errors(vec!["a".to_string()]);
        assert_eq!(ValidationReport::pass().merge(ValidationReport::pass()), ValidationReport::pass());
        let merged = failed.clone().merge(ValidationReport::from_errors(vec!["b".to_string()]));
        assert!(!merged.passed);
        assert_eq!(merged.errors(), &["a".to_string(), "b".to_string()]);
        assert!(!ValidationReport::pass().merge(failed).passed);
    }
}
