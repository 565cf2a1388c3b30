//! RPD Validator CLI
//!
//! Validates RPD documents against a schema release and checks their references.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rpd_validator::version::available_versions;
use rpd_validator::{
    load_document, schema_validate, validate_references, validate_rpd, SchemaSet, ValidationReport,
    ValidatorConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rpd-validator")]
#[command(about = "Validate RPD documents against the schema and reference rules")]
struct Cli {
    /// Config file (defaults to rpd-validator.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory holding one sub-directory per schema version
    #[arg(long, global = true)]
    schema_root: Option<PathBuf>,

    /// Schema version to validate against
    #[arg(long, global = true)]
    schema_version: Option<String>,

    /// Print validator messages without shortening them
    #[arg(long, global = true)]
    full_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an RPD against the schema
    Schema {
        /// RPD file
        rpd: PathBuf,
    },

    /// Check references and id uniqueness
    References {
        /// RPD file
        rpd: PathBuf,
    },

    /// Run schema and reference validation
    All {
        /// RPD file
        rpd: PathBuf,
    },

    /// Write a JSON report of a full validation
    Report {
        /// RPD file
        rpd: PathBuf,
        /// Output file (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List schema versions available under the schema root
    Versions,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether validation passed
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = ValidatorConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(root) = cli.schema_root {
        config.schemas.root = root;
    }
    if let Some(version) = cli.schema_version {
        config.schemas.version = version;
    }
    if cli.full_errors {
        config.report.full_errors = true;
    }

    match cli.command {
        Commands::Schema { rpd } => {
            let document = load_document(&rpd).with_context(|| format!("reading {:?}", rpd))?;
            let schemas = load_schemas(&config)?;
            let report = schema_validate(&document, &schemas, &config.report);
            Ok(print_report("Schema validation", &report))
        }

        Commands::References { rpd } => {
            let document = load_document(&rpd).with_context(|| format!("reading {:?}", rpd))?;
            let report = validate_references(&document);
            Ok(print_report("Reference validation", &report))
        }

        Commands::All { rpd } => {
            let document = load_document(&rpd).with_context(|| format!("reading {:?}", rpd))?;
            let schemas = load_schemas(&config)?;
            let report = validate_rpd(&document, &schemas, &config.report);
            Ok(print_report("Validation", &report))
        }

        Commands::Report { rpd, output } => {
            let document = load_document(&rpd).with_context(|| format!("reading {:?}", rpd))?;
            let schemas = load_schemas(&config)?;
            let schema_report = schema_validate(&document, &schemas, &config.report);
            let reference_report = validate_references(&document);
            let passed = schema_report.passed && reference_report.passed;

            let report = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "rpd": rpd.display().to_string(),
                "schema_version": schemas.version().version_string(),
                "passed": passed,
                "schema": schema_report,
                "references": reference_report,
            });
            let report_json = serde_json::to_string_pretty(&report)?;

            if let Some(path) = output {
                std::fs::write(&path, &report_json)?;
                println!("✅ Report written to {:?}", path);
            } else {
                println!("{}", report_json);
            }
            Ok(passed)
        }

        Commands::Versions => {
            let root = config.schema_root();
            let versions = available_versions(&root)
                .with_context(|| format!("listing schema versions in {:?}", root))?;
            if versions.is_empty() {
                println!("No schema versions found in {:?}", root);
            }
            for version in versions {
                println!("  {}", version);
            }
            Ok(true)
        }
    }
}

fn load_schemas(config: &ValidatorConfig) -> anyhow::Result<SchemaSet> {
    let version = config
        .schema_version()
        .with_context(|| format!("invalid schema version '{}'", config.schemas.version))?;
    let root = config.schema_root();
    SchemaSet::load(&root, &version)
        .with_context(|| format!("loading schema {} from {:?}", version, root))
}

fn print_report(title: &str, report: &ValidationReport) -> bool {
    if report.passed {
        println!("✅ {} passed", title);
    } else {
        println!("❌ {} failed:", title);
        for error in report.errors() {
            println!("  └─ {}", error);
        }
    }
    report.passed
}
