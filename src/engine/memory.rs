//! engine::memory
//!
//! An in-memory commit graph.
//!
//! [`MemoryStore`] holds commits whose snapshots are flat maps from file path
//! to blob id. Ids are SHA-256 digests of content, so identical snapshots and
//! identical subtrees get identical ids, and the filter engine's "did the
//! entry at this path change" test works the same as it does over git.
//!
//! The store is append-only: a commit can only be inserted once all of its
//! parents are present, which keeps the graph acyclic. Reads take `&self`,
//! so a built store can be shared between threads.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::core::commit::{Commit, TreeEntry};
use crate::core::types::{Oid, RepoPath};

use super::error::HistoryError;
use super::store::CommitStore;

/// A snapshot: file path to blob id.
pub type Tree = BTreeMap<RepoPath, Oid>;

/// An append-only commit graph held in memory.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    commits: HashMap<Oid, Commit>,
    trees: HashMap<Oid, Tree>,
    author_name: String,
    author_email: String,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_author("Anonymous", "anonymous@localhost")
    }

    fn with_author(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            commits: HashMap::new(),
            trees: HashMap::new(),
            author_name: name.into(),
            author_email: email.into(),
        }
    }

    /// Id of a blob with the given content.
    pub fn blob(content: &[u8]) -> Oid {
        digest(|h| h.update(content))
    }

    /// Add a commit and return its id.
    ///
    /// Inserting a commit identical to an existing one returns the existing
    /// id.
    ///
    /// # Errors
    ///
    /// [`HistoryError::NotFound`] if any parent is not in the store.
    pub fn insert(
        &mut self,
        parents: &[Oid],
        files: Tree,
        message: &str,
        time: DateTime<Utc>,
    ) -> Result<Oid, HistoryError> {
        if let Some(missing) = parents.iter().find(|p| !self.commits.contains_key(*p)) {
            return Err(HistoryError::not_found(format!("parent commit {missing}")));
        }

        let tree = subtree_id(&files, &RepoPath::root()).unwrap_or_else(empty_tree_id);
        let id = digest(|h| {
            h.update(b"tree ");
            h.update(tree.as_str());
            for parent in parents {
                h.update(b"\nparent ");
                h.update(parent.as_str());
            }
            h.update(format!("\nauthor {} <{}>", self.author_name, self.author_email));
            h.update(format!("\ntime {}\n\n", time.timestamp()));
            h.update(message);
        });

        self.trees.entry(tree.clone()).or_insert(files);
        self.commits.entry(id.clone()).or_insert_with(|| Commit {
            id: id.clone(),
            parents: parents.to_vec(),
            tree,
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            author_time: time,
            time,
            message: message.to_string(),
        });

        Ok(id)
    }

    /// The snapshot a commit records.
    pub fn tree_of(&self, commit: &Oid) -> Option<&Tree> {
        let commit = self.commits.get(commit)?;
        self.trees.get(&commit.tree)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

impl CommitStore for MemoryStore {
    fn lookup(&self, id: &Oid) -> Result<Commit, HistoryError> {
        self.commits
            .get(id)
            .cloned()
            .ok_or_else(|| HistoryError::not_found(format!("commit {id}")))
    }

    fn entry_at(&self, tree: &Oid, path: &RepoPath) -> Result<Option<TreeEntry>, HistoryError> {
        let files = self
            .trees
            .get(tree)
            .ok_or_else(|| HistoryError::not_found(format!("tree {tree}")))?;

        if path.is_root() {
            return Ok(Some(TreeEntry {
                id: tree.clone(),
                is_dir: true,
                mode: TreeEntry::DIR_MODE,
            }));
        }
        if let Some(blob) = files.get(path) {
            return Ok(Some(TreeEntry {
                id: blob.clone(),
                is_dir: false,
                mode: TreeEntry::FILE_MODE,
            }));
        }
        Ok(subtree_id(files, path).map(|id| TreeEntry {
            id,
            is_dir: true,
            mode: TreeEntry::DIR_MODE,
        }))
    }
}

fn digest(feed: impl FnOnce(&mut Sha256)) -> Oid {
    let mut hasher = Sha256::new();
    feed(&mut hasher);
    Oid::from_sha256(hasher.finalize().into())
}

fn empty_tree_id() -> Oid {
    digest(|_| {})
}

/// Digest of every file under `dir`, or `None` if nothing lives there.
fn subtree_id(files: &Tree, dir: &RepoPath) -> Option<Oid> {
    let prefix = dir.as_str();
    let mut entries = files
        .range(dir.clone()..)
        .take_while(|(path, _)| path.as_str().starts_with(prefix))
        .filter(|(path, _)| path.starts_with(dir) && *path != dir)
        .peekable();
    entries.peek()?;

    let strip = if dir.is_root() { 0 } else { prefix.len() + 1 };
    Some(digest(|h| {
        for (path, blob) in entries {
            h.update(&path.as_str()[strip..]);
            h.update(b"\0");
            h.update(blob.as_str());
            h.update(b"\n");
        }
    }))
}
