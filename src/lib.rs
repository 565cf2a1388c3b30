//! RPD Validator
//!
//! Validates ruleset project description (RPD) documents, the large nested JSON
//! building-energy models used for ASHRAE 229 ruleset checking.
//!
//! ## Features
//!
//! - **Schema Validation**: JSON Schema (Draft 7) conformance against a versioned schema release
//! - **Reference Integrity**: every referenced zone, HVAC system, fluid loop, schedule,
//!   piping and service water heating system must exist
//! - **Id Uniqueness**: ids are unique within every list, discovered without schema knowledge
//! - **Path Expressions**: a small JSONPath dialect (`$.a[*].b`) that tolerates optional fields
//!
//! ## Architecture
//!
//! ```text
//! document ──► jsonpath::{find_all, json_paths_to_lists} ──► checks ──┐
//!    │                                                                 ├──► validate (reports)
//!    └──────► schema::StructuralValidator ──► jsonpath::locator ──────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rpd_validator::{find_all, validate_references};
//! use serde_json::json;
//!
//! let rpd = json!({
//!     "ruleset_model_descriptions": [{
//!         "schedules": [{"id": "always-on"}],
//!         "buildings": [{"id": "b1", "building_open_schedule": "always-on"}]
//!     }]
//! });
//!
//! let ids = find_all("$.ruleset_model_descriptions[*].schedules[*].id", &rpd).unwrap();
//! assert_eq!(ids.len(), 1);
//! assert!(validate_references(&rpd).passed);
//! ```

pub mod checks;
pub mod config;
pub mod document;
pub mod error;
pub mod jsonpath;
pub mod schema;
pub mod validate;
pub mod version;

pub use checks::{
    check_fluid_loop_association, check_fluid_loop_or_piping_association, check_hvac_association,
    check_references, check_schedule_association, check_service_water_heating_association,
    check_unique_ids, check_zone_association, Association, CheckDefinition,
};
pub use config::{ReportConfig, ValidatorConfig};
pub use document::{load_document, parse_document};
pub use error::{Result, ValidatorError};
pub use jsonpath::{
    find_all, find_all_by_jsonpaths, json_paths_to_lists, nearest_id, to_expression,
    to_nearest_id_expression, PathExpression, Step, TraversalKey,
};
pub use schema::{SchemaFile, SchemaSet, StructuralValidator, StructuralViolation};
pub use validate::{schema_validate, validate_references, validate_rpd, ValidationReport};
pub use version::SchemaVersion;
