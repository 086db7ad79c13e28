//! engine::checkout
//!
//! Switch the working tree to a branch or commit.
//!
//! # Preconditions
//!
//! Checkout only runs from a clean state: no staged or unstaged changes to
//! tracked files, no unresolved conflicts, and no merge, rebase or similar
//! operation in progress. Untracked files are allowed. Anything else fails
//! with [`HistoryError::DirtyWorkingState`] before the tree is touched.
//!
//! # Attach or detach
//!
//! | target                          | resulting HEAD                     |
//! |---------------------------------|------------------------------------|
//! | branch name                     | attached to that branch            |
//! | commit that is a branch tip     | attached to that branch            |
//! | any other commit                | detached at the commit             |
//!
//! The tree is updated before HEAD moves. If moving HEAD then fails, the
//! tree is forced back to the commit HEAD still names, so no request leaves
//! the tree and HEAD disagreeing about tracked files.
//!
//! When several branches point at the commit, the current branch is kept if
//! it is one of them; otherwise the lexicographically smallest name wins.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::types::{BranchName, Oid, RefName};
use crate::git::{Git, GitError};

use super::error::HistoryError;
use super::refs::RefManager;

/// Where HEAD points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "name", rename_all = "lowercase")]
pub enum WorkingState {
    Attached(BranchName),
    Detached(Oid),
}

impl WorkingState {
    /// The branch name when attached, the full commit id when detached.
    pub fn branch(&self) -> &str {
        match self {
            WorkingState::Attached(b) => b.as_str(),
            WorkingState::Detached(oid) => oid.as_str(),
        }
    }

    pub fn is_detached(&self) -> bool {
        matches!(self, WorkingState::Detached(_))
    }
}

impl fmt::Display for WorkingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkingState::Attached(b) => write!(f, "branch {b}"),
            WorkingState::Detached(oid) => write!(f, "detached at {}", oid.short(7)),
        }
    }
}

/// What a checkout request named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    Branch(BranchName),
    Commit(Oid),
}

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutResult {
    pub previous: WorkingState,
    pub current: WorkingState,
    /// Commit now checked out
    pub commit: Oid,
}

/// Read where HEAD points.
///
/// # Errors
///
/// [`HistoryError::NotFound`] if the repository has no commits.
pub fn working_state(git: &Git) -> Result<WorkingState, HistoryError> {
    if let Some(branch) = git.current_branch()? {
        return Ok(WorkingState::Attached(branch));
    }
    match git.head_oid() {
        Ok(oid) => Ok(WorkingState::Detached(oid)),
        Err(GitError::RefNotFound { .. }) => Err(HistoryError::not_found("HEAD commit")),
        Err(e) => Err(e.into()),
    }
}

/// Interpret user input as a branch (short or `refs/heads/` form) or,
/// failing that, a revision naming a commit.
///
/// # Errors
///
/// [`HistoryError::NotFound`] if the input names neither.
pub fn resolve_target(git: &Git, input: &str) -> Result<CheckoutTarget, HistoryError> {
    let short = input.strip_prefix(RefName::HEADS).unwrap_or(input);
    if let Ok(branch) = BranchName::new(short) {
        if git.ref_exists(RefName::for_branch(&branch).as_str()) {
            return Ok(CheckoutTarget::Branch(branch));
        }
    }
    match git.try_resolve_commit(input)? {
        Some(oid) => Ok(CheckoutTarget::Commit(oid)),
        None => Err(HistoryError::not_found(format!("branch or commit '{input}'"))),
    }
}

/// Check out `target`.
///
/// # Errors
///
/// - [`HistoryError::DirtyWorkingState`] if the preconditions fail or the
///   checkout would overwrite local changes
/// - [`HistoryError::NotFound`] if a named branch vanished
pub fn checkout(git: &Git, target: &CheckoutTarget) -> Result<CheckoutResult, HistoryError> {
    ensure_clean(git)?;
    let previous = working_state(git)?;
    let previous_commit = git.head_oid()?;

    let (current, commit) = match target {
        CheckoutTarget::Branch(branch) => {
            let commit = git
                .try_resolve_ref(RefName::for_branch(branch).as_str())?
                .ok_or_else(|| HistoryError::not_found(format!("branch {branch}")))?;
            (WorkingState::Attached(branch.clone()), commit)
        }
        CheckoutTarget::Commit(commit) => {
            let tips = RefManager::new(git).branches_at(commit)?;
            let state = match &previous {
                WorkingState::Attached(b) if tips.contains(b) => WorkingState::Attached(b.clone()),
                _ => match tips.into_iter().min() {
                    Some(b) => WorkingState::Attached(b),
                    None => WorkingState::Detached(commit.clone()),
                },
            };
            (state, commit.clone())
        }
    };
    debug!(target = ?target, resolved = %current, "checkout target resolved");

    git.checkout_tree(&commit).map_err(|e| match e {
        GitError::CheckoutConflict { message } => HistoryError::DirtyWorkingState {
            details: message,
        },
        other => other.into(),
    })?;
    let moved = match &current {
        WorkingState::Attached(b) => git.set_head(&RefName::for_branch(b)),
        WorkingState::Detached(oid) => git.set_head_detached(oid),
    };
    if let Err(e) = moved {
        // HEAD did not move: put the tree back where HEAD still points.
        if let Err(restore) = git.restore_tree(&previous_commit) {
            warn!(error = %restore, commit = %previous_commit, "could not restore working tree");
        }
        return Err(e.into());
    }

    info!(from = %previous, to = %current, "checked out");
    Ok(CheckoutResult {
        previous,
        current,
        commit,
    })
}

fn ensure_clean(git: &Git) -> Result<(), HistoryError> {
    let state = git.state();
    if state.is_in_progress() {
        return Err(HistoryError::DirtyWorkingState {
            details: format!("{state} in progress"),
        });
    }
    let status = git.worktree_status(false)?;
    if !status.is_clean() {
        return Err(HistoryError::DirtyWorkingState {
            details: status.describe(),
        });
    }
    Ok(())
}
