//! Schema files and structural validation
//!
//! An RPD schema release is five JSON Schema (Draft 7) documents kept together in a
//! version directory:
//!
//! ```text
//! schema_versions/
//! └── 0.1.0/
//!     ├── ASHRAE229.schema.json
//!     ├── Enumerations2019ASHRAE901.schema.json
//!     ├── Enumerations2019T24.schema.json
//!     ├── EnumerationsRESNET.schema.json
//!     └── Output2019ASHRAE901.schema.json
//! ```
//!
//! The main schema `$ref`s the others by file name. All five are read and parsed
//! before anything is compiled.

use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::paths::PathChunk;
use jsonschema::{Draft, JSONSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ValidatorError};
use crate::jsonpath::TraversalKey;
use crate::version::SchemaVersion;

/// Base URI the validator resolves relative `$ref`s against
const REF_BASE_URI: &str = "json-schema:///";

/// One of the files making up a schema release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaFile {
    /// The RPD document schema
    Ashrae229,
    /// ASHRAE 90.1 enumerations
    Enumerations901,
    /// Title 24 enumerations
    EnumerationsT24,
    /// RESNET enumerations
    EnumerationsResnet,
    /// ASHRAE 90.1 output schema
    Output901,
}

impl SchemaFile {
    /// All files of a release, main schema first
    pub const ALL: [SchemaFile; 5] = [
        SchemaFile::Ashrae229,
        SchemaFile::Enumerations901,
        SchemaFile::EnumerationsT24,
        SchemaFile::EnumerationsResnet,
        SchemaFile::Output901,
    ];

    /// File name inside the version directory
    pub fn file_name(&self) -> &'static str {
        match self {
            SchemaFile::Ashrae229 => "ASHRAE229.schema.json",
            SchemaFile::Enumerations901 => "Enumerations2019ASHRAE901.schema.json",
            SchemaFile::EnumerationsT24 => "Enumerations2019T24.schema.json",
            SchemaFile::EnumerationsResnet => "EnumerationsRESNET.schema.json",
            SchemaFile::Output901 => "Output2019ASHRAE901.schema.json",
        }
    }
}

/// Paths of every schema file for `version` under `schema_root`
pub fn schema_file_paths(schema_root: &Path, version: &SchemaVersion) -> Vec<(SchemaFile, PathBuf)> {
    let version_dir = schema_root.join(version.dir_name());
    SchemaFile::ALL
        .iter()
        .map(|file| (*file, version_dir.join(file.file_name())))
        .collect()
}

/// A fully loaded schema release
#[derive(Debug, Clone)]
pub struct SchemaSet {
    version: SchemaVersion,
    main: Value,
    companions: Vec<(SchemaFile, Value)>,
}

impl SchemaSet {
    /// Build a set from an in-memory main schema
    pub fn new(version: SchemaVersion, main: Value) -> Self {
        Self {
            version,
            main,
            companions: Vec::new(),
        }
    }

    /// Add a companion document that the main schema may `$ref`
    pub fn with_companion(mut self, file: SchemaFile, document: Value) -> Self {
        self.companions.retain(|(existing, _)| *existing != file);
        self.companions.push((file, document));
        self
    }

    /// Read every file of `version` from `schema_root`
    pub fn load(schema_root: &Path, version: &SchemaVersion) -> Result<Self> {
        let mut main = None;
        let mut companions = Vec::new();

        for (file, path) in schema_file_paths(schema_root, version) {
            if !path.is_file() {
                return Err(ValidatorError::SchemaNotFound {
                    version: version.version_string(),
                    path: path.display().to_string(),
                });
            }
            debug!(path = %path.display(), "loading schema file");
            let content = fs::read_to_string(&path)?;
            let document: Value = serde_json::from_str(&content)?;
            match file {
                SchemaFile::Ashrae229 => main = Some(document),
                _ => companions.push((file, document)),
            }
        }

        let main = main.ok_or_else(|| ValidatorError::SchemaNotFound {
            version: version.version_string(),
            path: SchemaFile::Ashrae229.file_name().to_string(),
        })?;

        Ok(Self {
            version: version.clone(),
            main,
            companions,
        })
    }

    /// The release version
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }

    /// The main RPD schema
    pub fn main(&self) -> &Value {
        &self.main
    }

    /// Compile the main schema, with companions registered for `$ref` resolution
    ///
    /// The main schema is checked against the Draft 7 meta-schema while compiling.
    pub fn compile(&self) -> Result<StructuralValidator> {
        let mut options = JSONSchema::options();
        options.with_draft(Draft::Draft7);
        for (file, document) in &self.companions {
            options.with_document(format!("{}{}", REF_BASE_URI, file.file_name()), document.clone());
        }

        let compiled = options
            .compile(&self.main)
            .map_err(|e| ValidatorError::SchemaCompile(e.to_string()))?;

        Ok(StructuralValidator { compiled })
    }
}

/// One schema violation reported by the structural validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralViolation {
    /// Validator message
    pub message: String,
    /// Concrete location of the offending value
    pub location: Vec<TraversalKey>,
}

/// A compiled RPD schema
pub struct StructuralValidator {
    compiled: JSONSchema,
}

impl StructuralValidator {
    /// Every schema violation in `document`, in the order the validator reports them
    pub fn violations(&self, document: &Value) -> Vec<StructuralViolation> {
        match self.compiled.validate(document) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|error| {
                    let message = error.to_string();
                    let location = error
                        .instance_path
                        .into_iter()
                        .filter_map(|chunk| match chunk {
                            PathChunk::Property(name) => Some(TraversalKey::Field(name.into())),
                            PathChunk::Index(index) => Some(TraversalKey::Index(index)),
                            PathChunk::Keyword(_) => None,
                        })
                        .collect();
                    StructuralViolation { message, location }
                })
                .collect(),
        }
    }
}
