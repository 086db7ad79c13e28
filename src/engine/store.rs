//! engine::store
//!
//! Read access to the commit graph.
//!
//! A [`CommitStore`] answers two questions: what is commit `id`, and what
//! sits at `path` in tree `tree`. Everything else (walking, filtering,
//! resource resolution) is written against this trait, so the same code runs
//! over a real repository ([`GitStore`]) and an in-memory graph
//! ([`crate::engine::memory::MemoryStore`]).

use crate::core::commit::{Commit, TreeEntry};
use crate::core::types::{Oid, RepoPath};
use crate::git::{Git, GitError};

use super::error::HistoryError;
use super::walk::HistoryWalk;

/// Read-only access to commits and tree snapshots.
pub trait CommitStore {
    /// Look up a commit by id.
    ///
    /// # Errors
    ///
    /// [`HistoryError::NotFound`] if no such commit exists.
    fn lookup(&self, id: &Oid) -> Result<Commit, HistoryError>;

    /// The entry at `path` in the snapshot `tree`, or `None` if the path
    /// does not exist there. The root path yields the snapshot itself.
    fn entry_at(&self, tree: &Oid, path: &RepoPath) -> Result<Option<TreeEntry>, HistoryError>;

    /// Every commit reachable from `start`, newest first, children before
    /// parents.
    fn history(&self, start: &Oid) -> Result<HistoryWalk, HistoryError>
    where
        Self: Sized,
    {
        HistoryWalk::new(self, start)
    }
}

/// A [`CommitStore`] over a git repository.
///
/// Wraps one [`Git`] handle; open one store per request when reading
/// concurrently.
#[derive(Debug)]
pub struct GitStore {
    git: Git,
}

impl GitStore {
    pub fn new(git: Git) -> Self {
        Self { git }
    }

    pub fn git(&self) -> &Git {
        &self.git
    }
}

impl CommitStore for GitStore {
    fn lookup(&self, id: &Oid) -> Result<Commit, HistoryError> {
        self.git.commit(id).map_err(|e| match e {
            GitError::ObjectNotFound { .. } => HistoryError::not_found(format!("commit {id}")),
            other => other.into(),
        })
    }

    fn entry_at(&self, tree: &Oid, path: &RepoPath) -> Result<Option<TreeEntry>, HistoryError> {
        Ok(self.git.tree_entry(tree, path)?)
    }
}
