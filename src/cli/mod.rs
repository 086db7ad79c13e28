//! cli
//!
//! Command-line interface layer for Lineage.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install diagnostic logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! [`crate::engine::HistoryService`]. It never touches git directly.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::engine::HistoryService;
use crate::ui::logging;
use crate::ui::output::Verbosity;

/// Execution context shared by all command handlers.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Output verbosity from the global flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// The directory commands run in, as an absolute path.
    pub fn cwd(&self) -> Result<PathBuf> {
        let current = std::env::current_dir().context("Failed to read current directory")?;
        Ok(match &self.cwd {
            Some(dir) => current.join(dir),
            None => current,
        })
    }

    /// Open the repository containing the working directory.
    pub fn service(&self) -> Result<HistoryService> {
        let cwd = self.cwd()?;
        HistoryService::open(&cwd)
            .with_context(|| format!("Failed to open repository at {}", cwd.display()))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };
    logging::init(ctx.verbosity());

    commands::dispatch(cli.command, &ctx)
}
