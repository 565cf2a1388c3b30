//! Schema versioning utilities

use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Result, ValidatorError};

/// A released version of the RPD schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Semantic version (e.g., "0.1.0")
    pub version: Version,
}

impl SchemaVersion {
    /// Create a new schema version
    pub fn new(version: Version) -> Self {
        Self { version }
    }

    /// Create from a version string
    pub fn parse(version_str: &str) -> Result<Self> {
        // Strip leading 'v' if present
        let bare = version_str.strip_prefix('v').unwrap_or(version_str);
        let version = Version::parse(bare).map_err(|e| ValidatorError::InvalidVersion {
            version: version_str.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(version))
    }

    /// Get the version string (e.g., "0.1.0")
    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    /// Get the directory name holding this version's schema files
    pub fn dir_name(&self) -> String {
        self.version_string()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)
    }
}

/// Schema versions present under `schema_root`, oldest first
///
/// Every directory whose name parses as a version counts; anything else is ignored.
pub fn available_versions(schema_root: &Path) -> Result<Vec<SchemaVersion>> {
    let mut versions = Vec::new();

    for entry in WalkDir::new(schema_root).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else { continue };
        if let Ok(version) = SchemaVersion::parse(name) {
            versions.push(version);
        }
    }

    versions.sort();
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_version_parsing() {
        let v = SchemaVersion::parse("0.1.0").unwrap();
        assert_eq!(v.version_string(), "0.1.0");
        assert_eq!(v.dir_name(), "0.1.0");
        assert_eq!(v.to_string(), "v0.1.0");
    }

    #[test]
    fn test_version_with_v_prefix() {
        let v = SchemaVersion::parse("v0.1.3").unwrap();
        assert_eq!(v.version_string(), "0.1.3");
        assert!(matches!(
            SchemaVersion::parse("latest"),
            Err(ValidatorError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_available_versions_sorted() {
        let dir = tempdir().unwrap();
        for name in ["0.1.10", "0.1.2", "drafts"] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }
        std::fs::write(dir.path().join("0.9.0"), "not a directory").unwrap();

        let versions: Vec<String> = available_versions(dir.path())
            .unwrap()
            .iter()
            .map(SchemaVersion::version_string)
            .collect();
        assert_eq!(versions, vec!["0.1.2", "0.1.10"]);
    }
}
