//! RPD document loading
//!
//! Documents are read and parsed completely before any check sees them. The checks
//! treat missing data as "nothing to check", so a half-loaded tree would pass
//! silently instead of failing.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::Result;

/// Read and parse an RPD file
pub fn load_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let document = parse_document(&content)?;
    debug!(path = %path.display(), bytes = content.len(), "loaded RPD document");
    Ok(document)
}

/// Parse RPD text
pub fn parse_document(content: &str) -> Result<Value> {
    Ok(serde_json::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidatorError;
    use tempfile::tempdir;

    #[test]
    fn test_load_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, r#"{"id": "project", "ruleset_model_descriptions": []}"#).unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc["id"], "project");
    }

    #[test]
    fn test_truncated_document_fails_loudly() {
        let err = parse_document(r#"{"ruleset_model_descriptions": [{"id": "rmd""#).unwrap_err();
        assert!(matches!(err, ValidatorError::Json(_)));

        let missing = load_document(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(missing, ValidatorError::Io(_)));
    }
}
