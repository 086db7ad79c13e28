//! checkout command - Check out a branch or commit

use crate::cli::Context;
use crate::engine::WorkingState;
use crate::ui::output;
use anyhow::Result;

/// Check out `target`.
pub fn checkout(ctx: &Context, target: &str, json: bool) -> Result<()> {
    let service = ctx.service()?;
    let result = service.checkout(target)?;

    if json {
        return output::json(&result);
    }
    let message = match &result.current {
        WorkingState::Attached(branch) => format!("Switched to branch '{branch}'"),
        WorkingState::Detached(oid) => format!(
            "HEAD is now detached at {}",
            oid.short(service.config().abbrev())
        ),
    };
    output::success(message, ctx.verbosity());
    Ok(())
}
