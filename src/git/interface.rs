//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module is the **single doorway** to the repository. Every read and
//! write of commits, trees, refs and HEAD flows through [`Git`], which turns
//! git2 results into the crate's strong types and normalizes errors into
//! typed failure categories.
//!
//! # Error Handling
//!
//! - [`GitError::NotARepo`]: Not inside a git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::RefExists`]: Non-forced ref creation hit an existing ref
//! - [`GitError::CheckoutConflict`]: Safe checkout would overwrite local changes
//! - [`GitError::Internal`]: Anything else git2 reports, passed through verbatim

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::commit::{Commit, TreeEntry};
use crate::core::types::{BranchName, Oid, RefName, RepoPath, TypeError};

/// Errors from git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// A ref with this name already exists.
    #[error("ref already exists: {refname}")]
    RefExists {
        /// The existing ref
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Safe checkout refused to overwrite local changes.
    #[error("checkout conflict: {message}")]
    CheckoutConflict {
        /// git2's description of the conflict
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error, naming what was being accessed.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch => {
                if context.starts_with("refs/") || context == "HEAD" {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::Exists => GitError::RefExists {
                refname: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidRefName {
                message: format!("{}: {}", context, err.message()),
            },
            git2::ErrorCode::Conflict => GitError::CheckoutConflict {
                message: err.message().to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            other => GitError::InvalidRefName {
                message: other.to_string(),
            },
        }
    }
}

/// Information about a git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to the per-worktree git directory
    pub git_dir: PathBuf,
    /// Path to the shared git directory
    pub common_dir: PathBuf,
    /// Path to the working directory
    pub work_dir: PathBuf,
}

/// State of in-progress git operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitState {
    /// No operation in progress.
    Clean,
    Rebase,
    Merge,
    CherryPick,
    Revert,
    Bisect,
    ApplyMailbox,
}

impl GitState {
    /// Check if any operation is in progress.
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, GitState::Clean)
    }

    /// Human-readable description of the state.
    pub fn description(&self) -> &'static str {
        match self {
            GitState::Clean => "clean",
            GitState::Rebase => "rebase",
            GitState::Merge => "merge",
            GitState::CherryPick => "cherry-pick",
            GitState::Revert => "revert",
            GitState::Bisect => "bisect",
            GitState::ApplyMailbox => "apply-mailbox",
        }
    }
}

impl std::fmt::Display for GitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A ref with its name and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    /// The full ref name
    pub name: RefName,
    /// The commit the ref peels to
    pub oid: Oid,
    /// The ref's direct target when it differs from `oid` (annotated tags)
    pub tag_object: Option<Oid>,
}

/// Summary of working tree status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Number of staged changes
    pub staged: usize,
    /// Number of unstaged changes to tracked files
    pub unstaged: usize,
    /// Number of untracked files (if requested)
    pub untracked: usize,
    /// Whether there are unresolved conflicts
    pub has_conflicts: bool,
}

impl WorktreeStatus {
    /// No staged or unstaged changes and no conflicts. Untracked files
    /// do not count.
    pub fn is_clean(&self) -> bool {
        self.staged == 0 && self.unstaged == 0 && !self.has_conflicts
    }

    /// One-line description for error messages.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.staged > 0 {
            parts.push(format!("{} staged", self.staged));
        }
        if self.unstaged > 0 {
            parts.push(format!("{} unstaged", self.unstaged));
        }
        if self.has_conflicts {
            parts.push("unresolved conflicts".to_string());
        }
        if parts.is_empty() {
            "clean".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// The git interface.
///
/// One `Git` wraps one `git2::Repository` handle. Handles are cheap to open
/// and are not shared between threads; callers that need concurrency open
/// one per request.
pub struct Git {
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

fn to_git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|_| GitError::InvalidOid {
        oid: oid.to_string(),
    })
}

fn from_git2_oid(oid: git2::Oid) -> Result<Oid, GitError> {
    Ok(Oid::new(oid.to_string())?)
}

fn to_utc(time: git2::Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.seconds(), 0).unwrap_or(DateTime::UNIX_EPOCH)
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Get repository information.
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        Ok(RepoInfo {
            git_dir: self.repo.path().to_path_buf(),
            common_dir: self.repo.commondir().to_path_buf(),
            work_dir: self.repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf(),
        })
    }

    // =========================================================================
    // State Detection
    // =========================================================================

    /// Get the current in-progress operation state.
    pub fn state(&self) -> GitState {
        match self.repo.state() {
            git2::RepositoryState::Clean => GitState::Clean,
            git2::RepositoryState::Rebase
            | git2::RepositoryState::RebaseInteractive
            | git2::RepositoryState::RebaseMerge => GitState::Rebase,
            git2::RepositoryState::Merge => GitState::Merge,
            git2::RepositoryState::CherryPick | git2::RepositoryState::CherryPickSequence => {
                GitState::CherryPick
            }
            git2::RepositoryState::Revert | git2::RepositoryState::RevertSequence => {
                GitState::Revert
            }
            git2::RepositoryState::Bisect => GitState::Bisect,
            git2::RepositoryState::ApplyMailbox | git2::RepositoryState::ApplyMailboxOrRebase => {
                GitState::ApplyMailbox
            }
        }
    }

    /// Get working tree status summary.
    pub fn worktree_status(&self, include_untracked: bool) -> Result<WorktreeStatus, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(include_untracked)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut result = WorktreeStatus::default();
        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_conflicted() {
                result.has_conflicts = true;
            }
            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                result.staged += 1;
            }
            if status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
            {
                result.unstaged += 1;
            }
            if status.is_wt_new() {
                result.untracked += 1;
            }
        }

        Ok(result)
    }

    // =========================================================================
    // Ref Resolution
    // =========================================================================

    /// Resolve a ref to the commit it peels to.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the ref doesn't exist
    pub fn resolve_ref(&self, refname: &str) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname)
            .map_err(|e| GitError::from_git2(e, refname))?;

        let commit = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname))?;

        from_git2_oid(commit.id())
    }

    /// Resolve a ref, returning None if it doesn't exist.
    pub fn try_resolve_ref(&self, refname: &str) -> Result<Option<Oid>, GitError> {
        match self.resolve_ref(refname) {
            Ok(oid) => Ok(Some(oid)),
            Err(GitError::RefNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve a revision expression (`abc1234`, `main`, `v1.0`, `HEAD~2`)
    /// to a commit, returning None if it names no commit.
    pub fn try_resolve_commit(&self, spec: &str) -> Result<Option<Oid>, GitError> {
        let object = match self.repo.revparse_single(spec) {
            Ok(object) => object,
            Err(e)
                if matches!(
                    e.code(),
                    git2::ErrorCode::NotFound
                        | git2::ErrorCode::InvalidSpec
                        | git2::ErrorCode::UnbornBranch
                ) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(GitError::from_git2(e, spec)),
        };

        match object.peel_to_commit() {
            Ok(commit) => Ok(Some(from_git2_oid(commit.id())?)),
            Err(_) => Ok(None),
        }
    }

    /// Get HEAD commit OID.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (no commits yet)
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let commit = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        from_git2_oid(commit.id())
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(Some(BranchName::new(name)?));
            }
        }

        Ok(None)
    }

    /// Check if a ref exists.
    pub fn ref_exists(&self, refname: &str) -> bool {
        self.repo.find_reference(refname).is_ok()
    }

    /// List all refs under a prefix (e.g. `refs/heads/`), sorted by name.
    ///
    /// Refs that do not peel to a commit are skipped.
    pub fn list_refs_by_prefix(&self, prefix: &str) -> Result<Vec<RefEntry>, GitError> {
        let pattern = format!("{}*", prefix);
        let refs = self
            .repo
            .references_glob(&pattern)
            .map_err(|e| GitError::from_git2(e, prefix))?;

        let mut entries = Vec::new();
        for reference in refs {
            let reference = reference.map_err(|e| GitError::from_git2(e, prefix))?;

            let Some(name) = reference.name() else {
                continue;
            };
            let Ok(name) = RefName::new(name) else {
                continue;
            };
            let Ok(commit) = reference.peel_to_commit() else {
                continue;
            };

            let oid = from_git2_oid(commit.id())?;
            let tag_object = match reference.target() {
                Some(direct) if direct != commit.id() => Some(from_git2_oid(direct)?),
                _ => None,
            };

            entries.push(RefEntry {
                name,
                oid,
                tag_object,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    // =========================================================================
    // Ref Creation
    // =========================================================================

    /// Create a ref pointing at `target`; never overwrites.
    ///
    /// The ref file is written through git's lockfile, so the ref is either
    /// fully visible or absent.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefExists`] if the name is taken
    /// - [`GitError::ObjectNotFound`] if `target` is absent
    pub fn create_ref(&self, refname: &RefName, target: &Oid, message: &str) -> Result<(), GitError> {
        let oid = to_git2_oid(target)?;
        self.repo
            .find_object(oid, None)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;

        self.repo
            .reference(refname.as_str(), oid, false, message)
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;

        Ok(())
    }

    /// Create an annotated tag object and its `refs/tags/<name>` ref.
    ///
    /// Returns the id of the tag object. The tagger is the repository's
    /// configured signature.
    pub fn create_annotated_tag(
        &self,
        name: &str,
        target: &Oid,
        message: &str,
    ) -> Result<Oid, GitError> {
        let object = self
            .repo
            .find_object(to_git2_oid(target)?, None)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;

        let tagger = self
            .repo
            .signature()
            .map_err(|e| GitError::from_git2(e, "user signature"))?;

        let refname = format!("{}{}", RefName::TAGS, name);
        let tag_oid = self
            .repo
            .tag(name, &object, &tagger, message, false)
            .map_err(|e| GitError::from_git2(e, &refname))?;

        from_git2_oid(tag_oid)
    }

    /// Read the message of an annotated tag object.
    pub fn tag_message(&self, tag: &Oid) -> Result<String, GitError> {
        let tag = self
            .repo
            .find_tag(to_git2_oid(tag)?)
            .map_err(|e| GitError::from_git2(e, tag.as_str()))?;
        Ok(tag.message().unwrap_or("").to_string())
    }

    // =========================================================================
    // Commits and Trees
    // =========================================================================

    /// Read a commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit(&self, oid: &Oid) -> Result<Commit, GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(oid)?)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        let parents = commit
            .parent_ids()
            .map(from_git2_oid)
            .collect::<Result<Vec<_>, _>>()?;
        let author = commit.author();

        Ok(Commit {
            id: oid.clone(),
            parents,
            tree: from_git2_oid(commit.tree_id())?,
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            author_time: to_utc(author.when()),
            time: to_utc(commit.time()),
            message: commit.message().unwrap_or("").to_string(),
        })
    }

    /// Look up the entry at `path` inside `tree`.
    ///
    /// The root path yields the tree itself. Returns None if nothing exists
    /// at that path.
    pub fn tree_entry(&self, tree: &Oid, path: &RepoPath) -> Result<Option<TreeEntry>, GitError> {
        if path.is_root() {
            return Ok(Some(TreeEntry {
                id: tree.clone(),
                is_dir: true,
                mode: TreeEntry::DIR_MODE,
            }));
        }

        let tree = self
            .repo
            .find_tree(to_git2_oid(tree)?)
            .map_err(|e| GitError::from_git2(e, tree.as_str()))?;

        let entry = match tree.get_path(Path::new(path.as_str())) {
            Ok(entry) => entry,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, path.as_str())),
        };

        Ok(Some(TreeEntry {
            id: from_git2_oid(entry.id())?,
            is_dir: entry.kind() == Some(git2::ObjectType::Tree),
            mode: u32::try_from(entry.filemode()).unwrap_or_default(),
        }))
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Update the index and working tree to `commit` without touching HEAD.
    ///
    /// Uses a safe checkout: files with local modifications are never
    /// overwritten; git2 reports a conflict instead.
    pub fn checkout_tree(&self, commit: &Oid) -> Result<(), GitError> {
        let object = self
            .repo
            .find_object(to_git2_oid(commit)?, Some(git2::ObjectType::Commit))
            .map_err(|e| GitError::from_git2(e, commit.as_str()))?;

        let mut opts = git2::build::CheckoutBuilder::new();
        opts.safe();

        self.repo
            .checkout_tree(&object, Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, commit.as_str()))
    }

    /// Force the index and tracked files back to `commit`, discarding what
    /// a preceding [`Git::checkout_tree`] wrote. Untracked files are kept.
    pub fn restore_tree(&self, commit: &Oid) -> Result<(), GitError> {
        let object = self
            .repo
            .find_object(to_git2_oid(commit)?, Some(git2::ObjectType::Commit))
            .map_err(|e| GitError::from_git2(e, commit.as_str()))?;

        let mut opts = git2::build::CheckoutBuilder::new();
        opts.force();

        self.repo
            .checkout_tree(&object, Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, commit.as_str()))
    }

    /// Point HEAD at a branch ref.
    pub fn set_head(&self, refname: &RefName) -> Result<(), GitError> {
        self.repo
            .set_head(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))
    }

    /// Detach HEAD at a commit.
    pub fn set_head_detached(&self, commit: &Oid) -> Result<(), GitError> {
        self.repo
            .set_head_detached(to_git2_oid(commit)?)
            .map_err(|e| GitError::from_git2(e, commit.as_str()))
    }
}
