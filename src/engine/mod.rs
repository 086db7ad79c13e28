//! engine
//!
//! History queries, ref management and checkout over a commit store.
//!
//! # Architecture
//!
//! ```text
//! HistoryService ──► ResourceResolver ──► FilterLevel::scope_for ──► Scope
//!       │                                                              │
//!       └──► CommitStore ──► HistoryWalk ──► PathFilter(scope) ──► rows
//! ```
//!
//! - [`store`]: the [`CommitStore`] trait and its git implementation
//! - [`memory`]: an in-memory store for tests and embedding
//! - [`walk`]: ordered traversal (children first, then newest first)
//! - [`filter`]: keeps the commits that touch a scope
//! - [`resource`]: project, folder or file classification of a path
//! - [`refs`]: non-forced branch and tag creation, resolution, listing
//! - [`checkout`]: clean-state checkout with attach/detach resolution
//! - [`service`]: the request facade
//!
//! # Invariants
//!
//! - Filtered history is always a subsequence of the unfiltered walk
//! - Existing refs are never overwritten
//! - Checkout never discards local modifications

pub mod checkout;
pub mod error;
pub mod filter;
pub mod memory;
pub mod refs;
pub mod resource;
pub mod service;
pub mod store;
pub mod walk;

pub use checkout::{CheckoutResult, CheckoutTarget, WorkingState};
pub use error::HistoryError;
pub use filter::PathFilter;
pub use memory::MemoryStore;
pub use refs::{Ref, RefKind, RefManager};
pub use resource::ResourceResolver;
pub use service::{FilteredHistory, HistoryQuery, HistoryService, RefListing};
pub use store::{CommitStore, GitStore};
pub use walk::HistoryWalk;
