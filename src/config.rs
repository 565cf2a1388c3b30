//! Configuration management for the RPD validator
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (rpd-validator.toml)
//! - Environment variables (RPD_VALIDATOR__*)
//!
//! ## Example config file (rpd-validator.toml):
//! ```toml
//! [schemas]
//! root = "./schema_versions"
//! version = "0.1.0"
//!
//! [report]
//! full_errors = false
//! truncate_over = 160
//! head_chars = 20
//! tail_chars = 130
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, ValidatorError};
use crate::version::SchemaVersion;

/// Main configuration for the validator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Where schema releases live and which one to use
    #[serde(default)]
    pub schemas: SchemaSourceConfig,

    /// Message formatting
    #[serde(default)]
    pub report: ReportConfig,
}

/// Schema release selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSourceConfig {
    /// Directory containing one sub-directory per schema version
    #[serde(default = "default_schema_root")]
    pub root: PathBuf,

    /// Schema version to validate against
    #[serde(default = "default_schema_version")]
    pub version: String,
}

/// Formatting of structural validation messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report validator messages in full
    #[serde(default)]
    pub full_errors: bool,

    /// Messages longer than this many characters are shortened
    #[serde(default = "default_truncate_over")]
    pub truncate_over: usize,

    /// Characters kept from the start of a shortened message
    #[serde(default = "default_head_chars")]
    pub head_chars: usize,

    /// Characters kept from the end of a shortened message
    #[serde(default = "default_tail_chars")]
    pub tail_chars: usize,
}

// Default value functions
fn default_schema_root() -> PathBuf {
    PathBuf::from("schema_versions")
}

fn default_schema_version() -> String {
    "0.1.0".to_string()
}

fn default_truncate_over() -> usize {
    160
}

fn default_head_chars() -> usize {
    20
}

fn default_tail_chars() -> usize {
    130
}

impl Default for SchemaSourceConfig {
    fn default() -> Self {
        Self {
            root: default_schema_root(),
            version: default_schema_version(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            full_errors: false,
            truncate_over: default_truncate_over(),
            head_chars: default_head_chars(),
            tail_chars: default_tail_chars(),
        }
    }
}

impl ValidatorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally adding a required config file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "rpd-validator.toml",
            ".rpd-validator.toml",
            "config/rpd-validator.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "ashrae", "rpd-validator") {
            let xdg_config = config_dir.config_dir().join("rpd-validator.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (RPD_VALIDATOR__*)
        builder = builder.add_source(
            Environment::with_prefix("RPD_VALIDATOR")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The configured schema version
    pub fn schema_version(&self) -> Result<SchemaVersion> {
        SchemaVersion::parse(&self.schemas.version)
    }

    /// Get the schema root (resolves relative paths)
    pub fn schema_root(&self) -> PathBuf {
        if self.schemas.root.is_absolute() {
            self.schemas.root.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.schemas.root)
        }
    }
}
