//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens a [`crate::engine::HistoryService`] for the working directory
//! 2. Translates its arguments into one service request
//! 3. Formats and displays the result
//!
//! Handlers do NOT touch git directly.

mod branch;
mod checkout;
mod completion;
mod log;
mod refs;
mod status;
mod tag;

pub use branch::branch;
pub use checkout::checkout;
pub use completion::completion;
pub use log::log;
pub use refs::refs;
pub use status::status;
pub use tag::tag;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Log {
            path,
            filter,
            rev,
            max_count,
            json,
        } => log::log(ctx, path.as_deref(), filter, rev.as_deref(), max_count, json),
        Command::Branch { name, commit, json } => branch::branch(ctx, &name, &commit, json),
        Command::Tag {
            name,
            commit,
            message,
            json,
        } => tag::tag(ctx, &name, &commit, message.as_deref(), json),
        Command::Checkout { target, json } => checkout::checkout(ctx, &target, json),
        Command::Status { json } => status::status(ctx, json),
        Command::Refs { json } => refs::refs(ctx, json),
        Command::Completion { shell } => completion::completion(shell),
    }
}
