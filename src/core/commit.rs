//! core::commit
//!
//! Commit and history-row types shared by every store implementation.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::Oid;

/// An immutable commit node.
///
/// `time` is the committer timestamp and drives history ordering;
/// `author_time` is what presentation layers show as the commit date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Commit id
    pub id: Oid,
    /// Parent ids in order (first parent first)
    pub parents: Vec<Oid>,
    /// Root tree id
    pub tree: Oid,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp
    pub author_time: DateTime<Utc>,
    /// Committer timestamp
    pub time: DateTime<Utc>,
    /// Full commit message
    pub message: String,
}

impl Commit {
    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim_end()
    }

    /// Whether this is a root commit.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// The object found at a path inside a tree snapshot.
///
/// `id` is the blob id for a file and the subtree id for a directory. A
/// subtree id covers the names, modes and contents beneath it, so a file
/// entry carries its mode too: two snapshots agree on everything under a
/// path iff their entries are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub id: Oid,
    pub is_dir: bool,
    /// Git file mode (`0o100644`, `0o100755`, `0o120000`, `0o040000`, ...)
    pub mode: u32,
}

impl TreeEntry {
    /// Mode of a directory entry.
    pub const DIR_MODE: u32 = 0o040000;
    /// Mode of a regular, non-executable file.
    pub const FILE_MODE: u32 = 0o100644;
}

/// One row of a filtered history, as handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub commit_id: Oid,
    pub author_name: String,
    pub author_date: DateTime<Utc>,
    pub message: String,
}

impl From<&Commit> for HistoryEntry {
    fn from(commit: &Commit) -> Self {
        Self {
            commit_id: commit.id.clone(),
            author_name: commit.author_name.clone(),
            author_date: commit.author_time,
            message: commit.summary().to_string(),
        }
    }
}
