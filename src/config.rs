//! Configuration file support for govuln.
//!
//! Provides YAML-based configuration through `govuln.config.yml` files,
//! including data structures, file loading, and validation. Command-line
//! flags take precedence over every value read here.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::dto::{OutputFormat, MAX_JOBS, MIN_JOBS};
use crate::audit::domain::FetchProtocol;
use crate::audit::policies::StalenessPolicy;
use crate::audit::services::OwnershipFilter;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "govuln.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub internal_owners: Option<Vec<String>>,
    pub just_warn: Option<bool>,
    pub check_internal: Option<bool>,
    pub staleness_hours: Option<u64>,
    pub jobs: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub fetch_protocol: Option<FetchProtocol>,
    pub format: Option<OutputFormat>,
    pub store_path: Option<PathBuf>,
    pub scanner_binary: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    tracing::debug!(path = %config_path.display(), "using discovered config file");
    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(owners) = &config.internal_owners {
        OwnershipFilter::new(owners.clone()).with_context(|| {
            "Invalid config: internal_owners.\n\n💡 Hint: Owners are organization names such as \"acme\" (letters, digits, '-', '_' and '.')."
        })?;
    }

    if let Some(hours) = config.staleness_hours {
        StalenessPolicy::from_hours(hours).context("Invalid config: staleness_hours")?;
    }

    if let Some(jobs) = config.jobs {
        if !(MIN_JOBS..=MAX_JOBS).contains(&jobs) {
            bail!(
                "Invalid config: jobs must be between {} and {} (got {}).",
                MIN_JOBS,
                MAX_JOBS,
                jobs
            );
        }
    }

    if config.timeout_secs == Some(0) {
        bail!(
            "Invalid config: timeout_secs must be greater than 0.\n\n\
             💡 Hint: The timeout bounds every fetch and scan command, in seconds."
        );
    }

    if let Some(binary) = &config.scanner_binary {
        if binary.trim().is_empty() {
            bail!("Invalid config: scanner_binary must not be empty.");
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    let mut keys: Vec<&String> = config.unknown_fields.keys().collect();
    keys.sort();
    for key in keys {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
