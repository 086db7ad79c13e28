//! tag command - Create a tag at a commit

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

/// Create tag `name` at `commit`, annotated when `message` is given.
pub fn tag(
    ctx: &Context,
    name: &str,
    commit: &str,
    message: Option<&str>,
    json: bool,
) -> Result<()> {
    let service = ctx.service()?;
    let created = service.create_tag(name, commit, message)?;

    if json {
        return output::json(&created);
    }
    let kind = if created.annotation.is_some() {
        "annotated tag"
    } else {
        "tag"
    };
    output::success(
        format!(
            "Created {} '{}' at {}",
            kind,
            created.short_name(),
            created.target.short(service.config().abbrev())
        ),
        ctx.verbosity(),
    );
    Ok(())
}
