//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$LINEAGE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/lineage/config.toml`
//! 3. `~/.lineage/config.toml`
//!
//! # Repo Config
//!
//! Located at `<common_dir>/lineage/config.toml`.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::scope::FilterLevel;
use crate::core::types::RepoPath;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// default_filter = "project"
///
/// [log]
/// max_count = 200
/// abbrev = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Filter level used when a request does not name one
    pub default_filter: Option<FilterLevel>,

    /// History listing defaults
    pub log: Option<LogDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(log) = &self.log {
            log.validate()?;
        }
        Ok(())
    }
}

/// History listing defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogDefaults {
    /// Maximum number of rows returned (unlimited if unset)
    pub max_count: Option<usize>,

    /// Length of abbreviated commit ids in text output
    pub abbrev: Option<usize>,
}

impl LogDefaults {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == Some(0) {
            return Err(ConfigError::InvalidValue(
                "log.max_count must be at least 1".to_string(),
            ));
        }
        if let Some(abbrev) = self.abbrev {
            if !(4..=64).contains(&abbrev) {
                return Err(ConfigError::InvalidValue(format!(
                    "log.abbrev must be between 4 and 64, got {abbrev}"
                )));
            }
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// default_filter = "folder"
/// project_markers = [".project", "Cargo.toml"]
/// projects = ["tools/generator"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Overrides the global default filter level
    pub default_filter: Option<FilterLevel>,

    /// File names whose presence marks a directory as a project root
    pub project_markers: Option<Vec<String>>,

    /// Directories that are project roots regardless of markers
    pub projects: Option<Vec<String>>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for marker in self.project_markers.iter().flatten() {
            if marker.is_empty() || marker.contains('/') || marker == "." || marker == ".." {
                return Err(ConfigError::InvalidValue(format!(
                    "project marker '{marker}' must be a plain file name"
                )));
            }
        }

        for project in self.projects.iter().flatten() {
            RepoPath::new(project.as_str()).map_err(|e| {
                ConfigError::InvalidValue(format!("invalid project path: {e}"))
            })?;
        }

        Ok(())
    }
}
