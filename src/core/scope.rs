//! core::scope
//!
//! Filter levels, resources, and the scopes they resolve to.
//!
//! # Model
//!
//! A history request names a [`Resource`] (what the user selected) and a
//! [`FilterLevel`] (which of the view's filter toggles is active). The two
//! resolve to exactly one [`Scope`], the path restriction the filter engine
//! applies:
//!
//! | level      | Project resource  | Folder resource   | File resource     |
//! |------------|-------------------|-------------------|-------------------|
//! | none       | Project(path)     | Folder(path)      | File(path)        |
//! | repository | Repository        | Repository        | Repository        |
//! | project    | Project(project)  | Project(project)  | Project(project)  |
//! | folder     | Repository        | Folder(parent)    | Folder(parent)    |
//!
//! The folder level shows the container of the selection. A project's
//! container lies outside the project, so it widens to the repository.
//!
//! Scopes are totally ordered by breadth: File < Folder < Project < Repository.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::RepoPath;

/// Errors from scope validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("file scope needs a file path, not the repository root")]
    FileAtRoot,

    #[error("{kind} '{path}' is not inside project '{project}'")]
    OutsideProject {
        kind: ResourceKind,
        path: RepoPath,
        project: RepoPath,
    },
}

/// The filter toggle state of a history request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLevel {
    /// No toggle: the selection itself
    #[default]
    None,
    /// Whole repository
    Repository,
    /// Project containing the selection
    Project,
    /// Folder containing the selection
    Folder,
}

impl FilterLevel {
    /// All levels, in toggle order.
    pub const ALL: [FilterLevel; 4] = [
        FilterLevel::None,
        FilterLevel::Repository,
        FilterLevel::Project,
        FilterLevel::Folder,
    ];

    /// Resolve this level against a selected resource.
    pub fn scope_for(self, resource: &Resource) -> Scope {
        match self {
            FilterLevel::None => match resource.kind {
                ResourceKind::Project => Scope::Project(resource.path.clone()),
                ResourceKind::Folder => Scope::Folder(resource.path.clone()),
                ResourceKind::File => Scope::File(resource.path.clone()),
            },
            FilterLevel::Repository => Scope::Repository,
            FilterLevel::Project => Scope::Project(resource.project.clone()),
            FilterLevel::Folder => match (resource.kind, resource.path.parent()) {
                (ResourceKind::Project, _) | (_, None) => Scope::Repository,
                (_, Some(parent)) => Scope::Folder(parent),
            },
        }
    }

    /// Lowercase name, as used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterLevel::None => "none",
            FilterLevel::Repository => "repository",
            FilterLevel::Project => "project",
            FilterLevel::Folder => "folder",
        }
    }
}

impl fmt::Display for FilterLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(FilterLevel::None),
            "repository" | "repo" => Ok(FilterLevel::Repository),
            "project" => Ok(FilterLevel::Project),
            "folder" => Ok(FilterLevel::Folder),
            other => Err(format!(
                "unknown filter level '{other}', expected one of: none, repository, project, folder"
            )),
        }
    }
}

/// What kind of resource a selection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Project,
    Folder,
    File,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Project => "project",
            ResourceKind::Folder => "folder",
            ResourceKind::File => "file",
        })
    }
}

/// A selected resource together with the project that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// The selected path
    pub path: RepoPath,
    /// Its kind
    pub kind: ResourceKind,
    /// Root of the owning project (the repository root if there is none)
    pub project: RepoPath,
}

impl Resource {
    /// Build a resource, deriving `Project` kind when the path is the
    /// project root itself.
    ///
    /// # Errors
    ///
    /// Returns `ScopeError::OutsideProject` if `path` is not under `project`.
    pub fn new(path: RepoPath, is_dir: bool, project: RepoPath) -> Result<Self, ScopeError> {
        let kind = if path == project {
            ResourceKind::Project
        } else if is_dir {
            ResourceKind::Folder
        } else {
            ResourceKind::File
        };
        if !path.starts_with(&project) {
            return Err(ScopeError::OutsideProject {
                kind,
                path,
                project,
            });
        }
        Ok(Self {
            path,
            kind,
            project,
        })
    }
}

/// A resolved path restriction for a history walk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum Scope {
    /// Every commit reachable from the start point
    Repository,
    /// Commits touching anything under a project root
    Project(RepoPath),
    /// Commits touching anything under a folder
    Folder(RepoPath),
    /// Commits touching exactly one path
    File(RepoPath),
}

impl Scope {
    /// The restricted path, or `None` for repository scope.
    pub fn path(&self) -> Option<&RepoPath> {
        match self {
            Scope::Repository => None,
            Scope::Project(p) | Scope::Folder(p) | Scope::File(p) => Some(p),
        }
    }

    /// Rank in the breadth ordering (File 0 .. Repository 3).
    pub fn breadth(&self) -> u8 {
        match self {
            Scope::File(_) => 0,
            Scope::Folder(_) => 1,
            Scope::Project(_) => 2,
            Scope::Repository => 3,
        }
    }

    /// Check the scope is well-formed.
    pub fn validate(&self) -> Result<(), ScopeError> {
        match self {
            Scope::File(p) if p.is_root() => Err(ScopeError::FileAtRoot),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Repository => f.write_str("repository"),
            Scope::Project(p) => write!(f, "project '{}'", p),
            Scope::Folder(p) => write!(f, "folder '{}'", p),
            Scope::File(p) => write!(f, "file '{}'", p),
        }
    }
}
