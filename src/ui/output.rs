//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, output is machine-readable JSON.

use std::fmt::Display;

use anyhow::Result;
use serde::Serialize;

use crate::core::commit::HistoryEntry;
use crate::engine::{Ref, RefKind};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a value as pretty JSON on stdout (always shown).
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One history row: abbreviated id, date, author, summary.
pub fn format_history_row(entry: &HistoryEntry, abbrev: usize) -> String {
    format!(
        "{}  {}  {:<20}  {}",
        entry.commit_id.short(abbrev),
        entry.author_date.format("%Y-%m-%d %H:%M"),
        truncate(&entry.author_name, 20),
        entry.message
    )
}

/// One ref row: short name, target, and tag message if annotated.
pub fn format_ref(reference: &Ref, abbrev: usize) -> String {
    let marker = match reference.kind {
        RefKind::Branch => "branch",
        RefKind::Tag => "tag",
    };
    let mut line = format!(
        "{:<6}  {:<24}  {}",
        marker,
        reference.short_name(),
        reference.target.short(abbrev)
    );
    if let Some(annotation) = &reference.annotation {
        if let Some(summary) = annotation.message.lines().next() {
            line.push_str("  ");
            line.push_str(summary);
        }
    }
    line
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}~")
    }
}
