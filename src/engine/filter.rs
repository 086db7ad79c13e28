//! engine::filter
//!
//! Path-scoped filtering of an ordered history.
//!
//! [`PathFilter`] wraps any iterator of commits and passes through only those
//! that touch a [`Scope`]:
//!
//! - `Repository` keeps every commit
//! - for a path scope, a commit with parents is kept if the entry at the
//!   scoped path differs from the entry in *any* parent (missing counts as
//!   an entry)
//! - a root commit is kept if the path exists in its snapshot
//!
//! Entries are compared by id and mode. A subtree id changes exactly when a
//! name, mode or content beneath it changes, and a file entry changes on the
//! same events for that one path, so a folder's history is the union of the
//! histories of the files under it. The filter never reorders its input, so the output is
//! a subsequence of the walk.

use std::collections::HashMap;

use tracing::trace;

use crate::core::commit::{Commit, TreeEntry};
use crate::core::scope::Scope;
use crate::core::types::{Oid, RepoPath};

use super::error::HistoryError;
use super::store::CommitStore;

/// Iterator adaptor yielding the commits of `inner` that touch a scope.
pub struct PathFilter<'s, S: CommitStore + ?Sized, I> {
    store: &'s S,
    path: Option<RepoPath>,
    inner: I,
    /// Scoped entry per commit already inspected
    entries: HashMap<Oid, Option<TreeEntry>>,
}

impl<'s, S, I> PathFilter<'s, S, I>
where
    S: CommitStore + ?Sized,
    I: Iterator<Item = Commit>,
{
    /// Filter `inner` down to the commits that touch `scope`.
    ///
    /// # Errors
    ///
    /// [`HistoryError::InvalidScope`] if the scope is malformed.
    pub fn new(store: &'s S, inner: I, scope: &Scope) -> Result<Self, HistoryError> {
        scope.validate()?;
        Ok(Self {
            store,
            path: scope.path().cloned(),
            inner,
            entries: HashMap::new(),
        })
    }

    /// Whether `commit` changed the entry at `path`.
    fn touches(&mut self, commit: &Commit, path: &RepoPath) -> Result<bool, HistoryError> {
        let own = self.entry_of(&commit.id, Some(&commit.tree), path)?;
        if commit.is_root() {
            return Ok(own.is_some());
        }
        for parent in &commit.parents {
            if self.entry_of(parent, None, path)? != own {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Entry at `path` in commit `id`, memoized per commit.
    fn entry_of(
        &mut self,
        id: &Oid,
        tree: Option<&Oid>,
        path: &RepoPath,
    ) -> Result<Option<TreeEntry>, HistoryError> {
        if let Some(entry) = self.entries.get(id) {
            return Ok(entry.clone());
        }
        let tree = match tree {
            Some(t) => t.clone(),
            None => self.store.lookup(id)?.tree,
        };
        let entry = self.store.entry_at(&tree, path)?;
        self.entries.insert(id.clone(), entry.clone());
        Ok(entry)
    }
}

impl<S, I> Iterator for PathFilter<'_, S, I>
where
    S: CommitStore + ?Sized,
    I: Iterator<Item = Commit>,
{
    type Item = Result<Commit, HistoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let commit = self.inner.next()?;
            let Some(path) = self.path.clone() else {
                return Some(Ok(commit));
            };
            match self.touches(&commit, &path) {
                Ok(true) => return Some(Ok(commit)),
                Ok(false) => trace!(commit = %commit.id, "skipped"),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
