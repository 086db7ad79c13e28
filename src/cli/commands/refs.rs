//! refs command - List branches and tags

use crate::cli::Context;
use crate::ui::output;
use anyhow::Result;

/// List every branch and tag.
pub fn refs(ctx: &Context, json: bool) -> Result<()> {
    let service = ctx.service()?;
    let listing = service.list_refs()?;

    if json {
        return output::json(&listing);
    }
    let abbrev = service.config().abbrev();
    for reference in listing.branches.iter().chain(&listing.tags) {
        println!("{}", output::format_ref(reference, abbrev));
    }
    if listing.branches.is_empty() && listing.tags.is_empty() {
        output::print("No branches or tags", ctx.verbosity());
    }
    Ok(())
}
