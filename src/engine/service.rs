//! engine::service
//!
//! The request facade presentation layers talk to.
//!
//! [`HistoryService`] serves the four requests (filtered history, create
//! branch, create tag, checkout) plus the read-only queries a UI needs
//! around them.
//!
//! # Concurrency
//!
//! The service is `Send + Sync`. Each request opens its own repository
//! handle, so readers never share git state. A history request resolves its
//! start commit once and walks from there; refs created or HEAD moved while
//! it runs do not affect its result.
//!
//! Mutations are serialized twice: an in-process mutex orders writers within
//! one service, and the repository lock (`<common_dir>/lineage/lock`) orders
//! writers across processes. A writer that finds the repository lock held
//! fails with [`HistoryError::Locked`] instead of waiting.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::core::commit::HistoryEntry;
use crate::core::config::Config;
use crate::core::lock::RepoLock;
use crate::core::paths::LineagePaths;
use crate::core::scope::{FilterLevel, Resource, Scope};
use crate::core::types::{BranchName, Oid, RepoPath, TagName};
use crate::git::{Git, GitError};

use super::checkout::{self, CheckoutResult, WorkingState};
use super::error::HistoryError;
use super::filter::PathFilter;
use super::refs::{Ref, RefManager};
use super::resource::ResourceResolver;
use super::store::{CommitStore, GitStore};

/// Parameters of a filtered history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Selected resource, relative to the repository root
    pub path: RepoPath,
    /// Filter toggle; the configured default when `None`
    pub level: Option<FilterLevel>,
    /// Revision to walk from; HEAD when `None`
    pub start: Option<String>,
    /// Row limit; the configured default when `None`
    pub max_count: Option<usize>,
}

impl HistoryQuery {
    pub fn new(path: RepoPath) -> Self {
        Self {
            path,
            level: None,
            start: None,
            max_count: None,
        }
    }

    pub fn level(mut self, level: FilterLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn start(mut self, rev: impl Into<String>) -> Self {
        self.start = Some(rev.into());
        self
    }

    pub fn max_count(mut self, n: usize) -> Self {
        self.max_count = Some(n);
        self
    }
}

/// Result of a filtered history request.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredHistory {
    /// Commit the walk started from
    pub start: Oid,
    pub resource: Resource,
    pub scope: Scope,
    pub entries: Vec<HistoryEntry>,
}

/// Every branch and tag in the repository.
#[derive(Debug, Clone, Serialize)]
pub struct RefListing {
    pub branches: Vec<Ref>,
    pub tags: Vec<Ref>,
}

/// Serves history, ref and checkout requests for one repository.
#[derive(Debug)]
pub struct HistoryService {
    work_dir: PathBuf,
    paths: LineagePaths,
    config: Config,
    writer: Mutex<()>,
}

impl HistoryService {
    /// Open the repository containing `path`, loading its configuration.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::Git`] if `path` is not inside a non-bare repository
    /// - [`HistoryError::Config`] if a config file is malformed
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let git = Git::open(path)?;
        let paths = LineagePaths::from_repo_info(&git.info()?);
        let config = Config::load(Some(&paths))?;
        Self::with_config(path, config)
    }

    /// Open the repository containing `path` with an explicit configuration.
    pub fn with_config(path: &Path, config: Config) -> Result<Self, HistoryError> {
        let info = Git::open(path)?.info()?;
        let work_dir = info
            .work_dir
            .canonicalize()
            .unwrap_or_else(|_| info.work_dir.clone());
        debug!(work_dir = %work_dir.display(), "opened repository");

        Ok(Self {
            work_dir,
            paths: LineagePaths::from_repo_info(&info),
            config,
            writer: Mutex::new(()),
        })
    }

    /// Root of the working directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paths(&self) -> &LineagePaths {
        &self.paths
    }

    /// Convert a filesystem path (absolute, or relative to the working
    /// directory root) into a repository path.
    ///
    /// # Errors
    ///
    /// [`HistoryError::InvalidScope`] if the path lies outside the working
    /// directory.
    pub fn repo_path(&self, path: &Path) -> Result<RepoPath, HistoryError> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        };
        let full = full.canonicalize().unwrap_or(full);

        let relative = full
            .strip_prefix(&self.work_dir)
            .map_err(|_| HistoryError::InvalidScope {
                message: format!("'{}' is outside the repository", path.display()),
            })?;
        let relative = relative.to_str().ok_or_else(|| HistoryError::InvalidScope {
            message: format!("'{}' is not valid UTF-8", relative.display()),
        })?;

        Ok(RepoPath::new(relative.replace(std::path::MAIN_SEPARATOR, "/"))?)
    }

    fn git(&self) -> Result<Git, HistoryError> {
        Ok(Git::open(&self.work_dir)?)
    }

    fn write_guard(&self) -> Result<(RepoLock, MutexGuard<'_, ()>), HistoryError> {
        let guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = RepoLock::acquire(&self.paths)?;
        Ok((lock, guard))
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Commits touching the scope that `level` gives `resource_path`, newest
    /// first, from HEAD.
    pub fn get_filtered_history(
        &self,
        resource_path: &RepoPath,
        level: FilterLevel,
    ) -> Result<Vec<HistoryEntry>, HistoryError> {
        let query = HistoryQuery::new(resource_path.clone()).level(level);
        Ok(self.query(&query)?.entries)
    }

    /// Run a history request.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::NotFound`] if the start revision or the resource
    ///   does not exist
    /// - [`HistoryError::InvalidScope`] if the resolved scope is malformed
    #[instrument(skip(self), fields(path = %query.path))]
    pub fn query(&self, query: &HistoryQuery) -> Result<FilteredHistory, HistoryError> {
        let git = self.git()?;
        let start = match &query.start {
            Some(rev) => git
                .try_resolve_commit(rev)?
                .ok_or_else(|| HistoryError::not_found(format!("revision '{rev}'")))?,
            None => head_commit(&git)?,
        };

        let store = GitStore::new(git);
        let tip = store.lookup(&start)?;
        let resource = ResourceResolver::new(&store, Some(tip.tree), self.config.project_markers())
            .with_projects(self.config.projects())
            .with_work_dir(&self.work_dir)
            .resolve(&query.path)?;

        let level = query.level.unwrap_or_else(|| self.config.default_filter());
        let scope = level.scope_for(&resource);
        debug!(%level, %scope, start = %start, "walking history");

        let limit = query
            .max_count
            .or_else(|| self.config.max_count())
            .unwrap_or(usize::MAX);
        let walk = store.history(&start)?;
        let entries = PathFilter::new(&store, walk, &scope)?
            .take(limit)
            .map(|commit| commit.map(|c| HistoryEntry::from(&c)))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(rows = entries.len(), "history complete");
        Ok(FilteredHistory {
            start,
            resource,
            scope,
            entries,
        })
    }

    /// Classify a path against HEAD.
    pub fn resolve_resource(&self, path: &RepoPath) -> Result<Resource, HistoryError> {
        let git = self.git()?;
        let tree = match git.head_oid() {
            Ok(head) => Some(git.commit(&head)?.tree),
            Err(GitError::RefNotFound { .. }) => None,
            Err(e) => return Err(e.into()),
        };
        let store = GitStore::new(git);
        ResourceResolver::new(&store, tree, self.config.project_markers())
            .with_projects(self.config.projects())
            .with_work_dir(&self.work_dir)
            .resolve(path)
    }

    // =========================================================================
    // Refs
    // =========================================================================

    /// Create branch `name` at the commit `commit` names.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::InvalidName`] if `name` is not a valid branch name
    /// - [`HistoryError::TargetNotFound`] if `commit` names no commit
    /// - [`HistoryError::RefExists`] if the branch exists
    /// - [`HistoryError::Locked`] if another writer holds the repository
    pub fn create_branch(&self, name: &str, commit: &str) -> Result<Ref, HistoryError> {
        let name = BranchName::new(name)?;
        let _guard = self.write_guard()?;
        let git = self.git()?;
        let target = resolve_target_commit(&git, commit)?;
        RefManager::new(&git).create_branch(&name, &target)
    }

    /// Create tag `name` at the commit `commit` names; annotated when
    /// `message` is given.
    ///
    /// # Errors
    ///
    /// As [`HistoryService::create_branch`].
    pub fn create_tag(
        &self,
        name: &str,
        commit: &str,
        message: Option<&str>,
    ) -> Result<Ref, HistoryError> {
        let name = TagName::new(name)?;
        let _guard = self.write_guard()?;
        let git = self.git()?;
        let target = resolve_target_commit(&git, commit)?;
        RefManager::new(&git).create_tag(&name, &target, message)
    }

    /// The commit a full ref name resolves to.
    pub fn resolve(&self, refname: &str) -> Result<Oid, HistoryError> {
        RefManager::new(&self.git()?).resolve(refname)
    }

    /// All branches and tags, sorted by name.
    pub fn list_refs(&self) -> Result<RefListing, HistoryError> {
        let git = self.git()?;
        let refs = RefManager::new(&git);
        Ok(RefListing {
            branches: refs.list_branches()?,
            tags: refs.list_tags()?,
        })
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Check out a branch or commit.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::NotFound`] if `target` names neither
    /// - [`HistoryError::DirtyWorkingState`] if the working tree is not clean
    /// - [`HistoryError::Locked`] if another writer holds the repository
    pub fn checkout(&self, target: &str) -> Result<CheckoutResult, HistoryError> {
        let _guard = self.write_guard()?;
        let git = self.git()?;
        let target = checkout::resolve_target(&git, target)?;
        checkout::checkout(&git, &target)
    }

    /// Where HEAD points.
    pub fn working_state(&self) -> Result<WorkingState, HistoryError> {
        checkout::working_state(&self.git()?)
    }
}

fn head_commit(git: &Git) -> Result<Oid, HistoryError> {
    match git.head_oid() {
        Ok(oid) => Ok(oid),
        Err(GitError::RefNotFound { .. }) => Err(HistoryError::not_found("HEAD commit")),
        Err(e) => Err(e.into()),
    }
}

fn resolve_target_commit(git: &Git, commit: &str) -> Result<Oid, HistoryError> {
    git.try_resolve_commit(commit)?
        .ok_or_else(|| HistoryError::TargetNotFound {
            target: commit.to_string(),
        })
}
