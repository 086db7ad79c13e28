//! Lineage - scoped commit history for git repositories
//!
//! Lineage answers "which commits touched this file, folder or project?"
//! and lets a history view act on what it shows: create branches and tags at
//! a commit, and check out a branch or commit.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - History walk, path filter, refs and checkout
//! - [`core`] - Domain types, scopes, configuration and locking
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Output formatting and logging
//!
//! # Correctness Invariants
//!
//! 1. Filtered history is a subsequence of the full walk, children first
//! 2. Refs are created, never overwritten
//! 3. Checkout never discards local modifications
//! 4. Writers are serialized per repository
//!
//! # Example
//!
//! ```no_run
//! use lineage::core::scope::FilterLevel;
//! use lineage::core::types::RepoPath;
//! use lineage::engine::HistoryService;
//! use std::path::Path;
//!
//! let service = HistoryService::open(Path::new(".")).unwrap();
//! let file = RepoPath::new("GeneralProject/folder/test.txt").unwrap();
//! for row in service.get_filtered_history(&file, FilterLevel::Project).unwrap() {
//!     println!("{} {}", row.commit_id.short(7), row.message);
//! }
//! ```

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod ui;
