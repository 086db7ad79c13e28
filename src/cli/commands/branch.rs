//! branch command - Create a branch at a commit

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

/// Create branch `name` at `commit`.
pub fn branch(ctx: &Context, name: &str, commit: &str, json: bool) -> Result<()> {
    let service = ctx.service()?;
    let created = service.create_branch(name, commit)?;

    if json {
        return output::json(&created);
    }
    output::success(
        format!(
            "Created branch '{}' at {}",
            created.short_name(),
            created.target.short(service.config().abbrev())
        ),
        ctx.verbosity(),
    );
    Ok(())
}
