//! core::paths
//!
//! Centralized path routing for Lineage storage locations.
//!
//! Repo-scoped data lives under `<common_dir>/lineage/` so that linked
//! worktrees share one config file and one writer lock:
//! - `config.toml` - Repository configuration
//! - `lock` - Exclusive writer lock
//!
//! # Example
//!
//! ```
//! use lineage::core::paths::LineagePaths;
//! use std::path::PathBuf;
//!
//! let paths = LineagePaths::new(
//!     PathBuf::from("/repo/.git"),
//!     PathBuf::from("/repo/.git"),
//! );
//!
//! assert_eq!(
//!     paths.repo_config_path(),
//!     PathBuf::from("/repo/.git/lineage/config.toml")
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::git::RepoInfo;

/// Storage locations for one repository.
///
/// No code outside this module should compute `*.join("lineage")` paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineagePaths {
    /// Per-worktree git directory (`.git/worktrees/<name>/` for linked worktrees).
    pub git_dir: PathBuf,
    /// Shared git directory (refs, objects, config).
    pub common_dir: PathBuf,
}

impl LineagePaths {
    /// Create paths from git_dir and common_dir.
    pub fn new(git_dir: PathBuf, common_dir: PathBuf) -> Self {
        Self {
            git_dir,
            common_dir,
        }
    }

    /// Create paths from a RepoInfo.
    pub fn from_repo_info(info: &RepoInfo) -> Self {
        Self {
            git_dir: info.git_dir.clone(),
            common_dir: info.common_dir.clone(),
        }
    }

    /// Root Lineage directory under common_dir.
    pub fn repo_lineage_dir(&self) -> PathBuf {
        self.common_dir.join("lineage")
    }

    /// Repository config file.
    pub fn repo_config_path(&self) -> PathBuf {
        self.repo_lineage_dir().join("config.toml")
    }

    /// Writer lock file.
    pub fn repo_lock_path(&self) -> PathBuf {
        self.repo_lineage_dir().join("lock")
    }

    /// Whether this is a linked worktree (git_dir differs from common_dir).
    pub fn is_worktree(&self) -> bool {
        self.git_dir != self.common_dir
    }

    /// The shared git directory.
    pub fn common_dir(&self) -> &Path {
        &self.common_dir
    }
}
