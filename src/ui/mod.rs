//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//! - [`logging`] - Diagnostic logging setup
//!
//! # Design
//!
//! Results go to stdout through [`output`]; diagnostics go to stderr through
//! `tracing`, so piping `--json` output stays clean.

pub mod logging;
pub mod output;
