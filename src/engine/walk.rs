//! engine::walk
//!
//! Ordered traversal of the commit graph.
//!
//! # Ordering
//!
//! The walk yields every commit reachable from the start point exactly once:
//!
//! - a commit is never yielded before any of its reachable children
//! - among commits whose children have all been yielded, the one with the
//!   latest commit time goes first; ties break on the smaller id
//!
//! So the order is a topological order refined by time, and it is fully
//! determined by the graph.
//!
//! # Algorithm
//!
//! One pass over the reachable set loads each commit and counts its
//! children inside the set. Emission then runs Kahn's algorithm with a
//! max-heap keyed on `(time, Reverse(id))`: a commit becomes ready when
//! its last child has been yielded.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::commit::Commit;
use crate::core::types::Oid;

use super::error::HistoryError;
use super::store::CommitStore;

/// Iterator over the commits reachable from a start point.
#[derive(Debug)]
pub struct HistoryWalk {
    /// Loaded commits not yet yielded
    nodes: HashMap<Oid, Commit>,
    /// Children of each pending commit not yet yielded
    waiting_on: HashMap<Oid, usize>,
    /// Commits with no pending children
    ready: BinaryHeap<(DateTime<Utc>, Reverse<Oid>)>,
}

impl HistoryWalk {
    /// Load the reachable set of `start` and prepare the walk.
    ///
    /// # Errors
    ///
    /// [`HistoryError::NotFound`] if `start` or any reachable parent is
    /// missing from the store.
    pub fn new<S: CommitStore + ?Sized>(store: &S, start: &Oid) -> Result<Self, HistoryError> {
        let mut nodes: HashMap<Oid, Commit> = HashMap::new();
        let mut waiting_on: HashMap<Oid, usize> = HashMap::new();
        let mut stack = vec![start.clone()];

        while let Some(id) = stack.pop() {
            if nodes.contains_key(&id) {
                continue;
            }
            let commit = store.lookup(&id)?;
            for parent in &commit.parents {
                *waiting_on.entry(parent.clone()).or_insert(0) += 1;
                if !nodes.contains_key(parent) {
                    stack.push(parent.clone());
                }
            }
            nodes.insert(id, commit);
        }

        debug!(start = %start, commits = nodes.len(), "loaded reachable history");

        let mut ready = BinaryHeap::new();
        for (id, commit) in &nodes {
            if !waiting_on.contains_key(id) {
                ready.push((commit.time, Reverse(id.clone())));
            }
        }

        Ok(Self {
            nodes,
            waiting_on,
            ready,
        })
    }

    /// Number of commits not yet yielded.
    pub fn remaining(&self) -> usize {
        self.nodes.len()
    }
}

impl Iterator for HistoryWalk {
    type Item = Commit;

    fn next(&mut self) -> Option<Commit> {
        let (_, Reverse(id)) = self.ready.pop()?;
        let commit = self.nodes.remove(&id)?;

        for parent in &commit.parents {
            let Some(count) = self.waiting_on.get_mut(parent) else {
                continue;
            };
            *count -= 1;
            if *count == 0 {
                self.waiting_on.remove(parent);
                if let Some(p) = self.nodes.get(parent) {
                    self.ready.push((p.time, Reverse(parent.clone())));
                }
            }
        }

        Some(commit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.ready.len().min(1), Some(self.nodes.len()))
    }
}
