//! status command - Show where HEAD points

use crate::cli::Context;
use crate::engine::WorkingState;
use crate::ui::output;
use anyhow::Result;

/// Show the working state.
pub fn status(ctx: &Context, json: bool) -> Result<()> {
    let service = ctx.service()?;
    let state = service.working_state()?;

    if json {
        return output::json(&state);
    }
    match &state {
        WorkingState::Attached(branch) => println!("On branch {branch}"),
        WorkingState::Detached(oid) => println!("HEAD detached at {oid}"),
    }
    Ok(())
}
