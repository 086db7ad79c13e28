//! git
//!
//! Single interface for all git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to git. No other module imports
//! `git2`. Commits come back as [`crate::core::commit::Commit`], ids as
//! [`crate::core::types::Oid`], names as validated ref types.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Ref resolution, enumeration and non-forced creation
//! - Commit and tree reads
//! - Status and state detection
//! - Safe checkout and HEAD updates
//!
//! # Example
//!
//! ```ignore
//! use lineage::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head_oid()?;
//! let commit = git.commit(&head)?;
//! println!("{} {}", head.short(7), commit.summary());
//! ```

mod interface;

pub use interface::{
    Git, GitError, GitState, RefEntry, RepoInfo, WorktreeStatus,
};
