//! engine::error
//!
//! The error type every history, ref and checkout request returns.
//!
//! Lower layers keep their own error enums ([`GitError`], [`ConfigError`],
//! [`LockError`], [`TypeError`], [`ScopeError`]); this module folds them into
//! the categories callers act on.

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::lock::{holder_suffix, LockError};
use crate::core::scope::ScopeError;
use crate::core::types::{RefName, TypeError};
use crate::git::GitError;

/// Errors from engine requests.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A resource path, commit or ref does not exist.
    #[error("not found: {what}")]
    NotFound { what: String },

    /// Non-forced ref creation hit an existing ref.
    #[error("ref already exists: {refname}")]
    RefExists { refname: RefName },

    /// The commit a new ref should point at does not exist.
    #[error("target commit not found: {target}")]
    TargetNotFound { target: String },

    /// Checkout refused because of local changes or an operation in progress.
    #[error("working tree is not clean: {details}")]
    DirtyWorkingState { details: String },

    /// A scope that cannot be evaluated.
    #[error("invalid scope: {message}")]
    InvalidScope { message: String },

    /// A branch, tag or ref name that git would reject.
    #[error("invalid name: {message}")]
    InvalidName { message: String },

    /// Another writer holds the repository lock.
    #[error("repository is locked by another writer{}", holder_suffix(.holder))]
    Locked { holder: Option<u32> },

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lock(LockError),
}

impl HistoryError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        HistoryError::NotFound { what: what.into() }
    }
}

impl From<LockError> for HistoryError {
    fn from(err: LockError) -> Self {
        match err {
            LockError::AlreadyLocked { holder } => HistoryError::Locked { holder },
            other => HistoryError::Lock(other),
        }
    }
}

impl From<ScopeError> for HistoryError {
    fn from(err: ScopeError) -> Self {
        HistoryError::InvalidScope {
            message: err.to_string(),
        }
    }
}

impl From<TypeError> for HistoryError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidPath(message) => HistoryError::InvalidScope { message },
            other => HistoryError::InvalidName {
                message: other.to_string(),
            },
        }
    }
}
