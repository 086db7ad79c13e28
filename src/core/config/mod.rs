//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Later overrides earlier:
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. Request parameters / CLI flags (not handled here)
//!
//! # Example
//!
//! ```no_run
//! use lineage::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("abbrev: {}", config.abbrev());
//! println!("markers: {:?}", config.project_markers());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, LogDefaults, RepoConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::LineagePaths;
use crate::core::scope::FilterLevel;
use crate::core::types::RepoPath;

/// Marker file identifying a project root when none is configured.
pub const DEFAULT_PROJECT_MARKER: &str = ".project";

/// Abbreviated commit id length when none is configured.
pub const DEFAULT_ABBREV: usize = 7;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence; repo config overrides global config.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo and present)
    pub repo: Option<RepoConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `paths` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. Missing files are not an error.
    pub fn load(paths: Option<&LineagePaths>) -> Result<Config, ConfigError> {
        Self::load_from(&Self::global_candidates(), paths)
    }

    /// Load using an explicit list of global config candidates.
    ///
    /// The first candidate that exists wins.
    pub fn load_from(
        global_candidates: &[PathBuf],
        paths: Option<&LineagePaths>,
    ) -> Result<Config, ConfigError> {
        let (global, global_path) = match global_candidates.iter().find(|p| p.exists()) {
            Some(path) => (read_toml::<GlobalConfig>(path)?, Some(path.clone())),
            None => (GlobalConfig::default(), None),
        };
        global.validate()?;

        let (repo, repo_path) = match paths.map(LineagePaths::repo_config_path) {
            Some(path) if path.exists() => (Some(read_toml::<RepoConfig>(&path)?), Some(path)),
            _ => (None, None),
        };
        if let Some(r) = &repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
        })
    }

    /// Global config locations, in search order.
    pub fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("LINEAGE_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("lineage/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".lineage/config.toml"));
        }
        candidates
    }

    /// Write repo config atomically (temp file, then rename).
    pub fn write_repo(paths: &LineagePaths, config: &RepoConfig) -> Result<PathBuf, ConfigError> {
        config.validate()?;
        let path = paths.repo_config_path();
        write_config_atomic(&path, config)?;
        Ok(path)
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Default filter level; `None` (the selection itself) if unset.
    pub fn default_filter(&self) -> FilterLevel {
        self.repo
            .as_ref()
            .and_then(|r| r.default_filter)
            .or(self.global.default_filter)
            .unwrap_or_default()
    }

    /// Maximum number of history rows, if limited.
    pub fn max_count(&self) -> Option<usize> {
        self.global.log.as_ref().and_then(|l| l.max_count)
    }

    /// Abbreviated commit id length.
    pub fn abbrev(&self) -> usize {
        self.global
            .log
            .as_ref()
            .and_then(|l| l.abbrev)
            .unwrap_or(DEFAULT_ABBREV)
    }

    /// Marker file names identifying project roots.
    pub fn project_markers(&self) -> Vec<String> {
        self.repo
            .as_ref()
            .and_then(|r| r.project_markers.clone())
            .unwrap_or_else(|| vec![DEFAULT_PROJECT_MARKER.to_string()])
    }

    /// Explicitly configured project roots.
    pub fn projects(&self) -> Vec<RepoPath> {
        self.repo
            .as_ref()
            .and_then(|r| r.projects.as_ref())
            .map(|projects| {
                projects
                    .iter()
                    .filter_map(|p| RepoPath::new(p.as_str()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Path the global config was loaded from.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Path the repo config was loaded from.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_config_atomic<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ConfigError::WriteError { path, source }
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err(path))?;
    }

    let contents =
        toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

    let temp_path = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
    file.write_all(contents.as_bytes())
        .map_err(write_err(&temp_path))?;
    file.sync_all().map_err(write_err(&temp_path))?;

    fs::rename(&temp_path, path).map_err(write_err(path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_paths(dir: &Path) -> LineagePaths {
        LineagePaths::new(dir.to_path_buf(), dir.to_path_buf())
    }

    #[test]
    fn defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&[temp.path().join("missing.toml")], None).unwrap();

        assert_eq!(config.default_filter(), FilterLevel::None);
        assert_eq!(config.max_count(), None);
        assert_eq!(config.abbrev(), DEFAULT_ABBREV);
        assert_eq!(config.project_markers(), vec![".project".to_string()]);
        assert!(config.projects().is_empty());
        assert!(config.global_config_loaded_from().is_none());
    }

    #[test]
    fn first_existing_global_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first.toml");
        let second = temp.path().join("second.toml");
        fs::write(&second, "default_filter = \"folder\"").unwrap();

        let config = Config::load_from(&[first, second.clone()], None).unwrap();
        assert_eq!(config.default_filter(), FilterLevel::Folder);
        assert_eq!(config.global_config_loaded_from(), Some(second.as_path()));
    }

    #[test]
    fn repo_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("global.toml");
        fs::write(&global, "default_filter = \"repository\"\n[log]\nabbrev = 12\n").unwrap();

        let paths = repo_paths(temp.path());
        fs::create_dir_all(paths.repo_lineage_dir()).unwrap();
        fs::write(
            paths.repo_config_path(),
            "default_filter = \"project\"\nproject_markers = [\"Cargo.toml\"]\nprojects = [\"tools/gen\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&[global], Some(&paths)).unwrap();
        assert_eq!(config.default_filter(), FilterLevel::Project);
        assert_eq!(config.abbrev(), 12);
        assert_eq!(config.project_markers(), vec!["Cargo.toml".to_string()]);
        assert_eq!(config.projects(), vec![RepoPath::new("tools/gen").unwrap()]);
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let paths = repo_paths(temp.path());
        fs::create_dir_all(paths.repo_lineage_dir()).unwrap();
        fs::write(paths.repo_config_path(), "trunk = \"main\"").unwrap();

        assert!(matches!(
            Config::load_from(&[], Some(&paths)),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn write_repo_config_atomic() {
        let temp = TempDir::new().unwrap();
        let paths = repo_paths(temp.path());
        let config = RepoConfig {
            project_markers: Some(vec![".project".into(), "pom.xml".into()]),
            ..Default::default()
        };

        let path = Config::write_repo(&paths, &config).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        let loaded = Config::load_from(&[], Some(&paths)).unwrap();
        assert_eq!(loaded.project_markers().len(), 2);
        assert_eq!(loaded.repo_config_loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn write_rejects_invalid_config() {
        let temp = TempDir::new().unwrap();
        let config = RepoConfig {
            project_markers: Some(vec!["".into()]),
            ..Default::default()
        };
        assert!(Config::write_repo(&repo_paths(temp.path()), &config).is_err());
    }
}
