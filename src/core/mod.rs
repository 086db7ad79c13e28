//! core
//!
//! Core domain types, schemas and configuration for Lineage.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, BranchName, TagName, RefName, RepoPath
//! - [`commit`] - Commit nodes and history rows
//! - [`scope`] - Filter levels, resources and scopes
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for Lineage storage
//! - [`lock`] - Exclusive writer lock
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at construction time
//! - Nothing here touches git; all repository access lives in [`crate::git`]

pub mod commit;
pub mod config;
pub mod lock;
pub mod paths;
pub mod scope;
pub mod types;
