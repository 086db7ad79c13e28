//! log command - Show the commits that touch a file, folder or project

use std::path::Path;

use crate::cli::Context;
use crate::core::scope::FilterLevel;
use crate::engine::HistoryQuery;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Show filtered history.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `path` - Selected resource, relative to the working directory
/// * `filter` - Filter level (configured default if omitted)
/// * `rev` - Start revision (HEAD if omitted)
/// * `max_count` - Row limit
/// * `json` - Emit JSON instead of text
pub fn log(
    ctx: &Context,
    path: Option<&Path>,
    filter: Option<FilterLevel>,
    rev: Option<&str>,
    max_count: Option<usize>,
    json: bool,
) -> Result<()> {
    let service = ctx.service()?;
    let cwd = ctx.cwd()?;
    let selected = match path {
        Some(p) => cwd.join(p),
        None => cwd,
    };
    let repo_path = service.repo_path(&selected)?;

    let mut query = HistoryQuery::new(repo_path);
    query.level = filter;
    query.start = rev.map(str::to_string);
    query.max_count = max_count;

    let history = service
        .query(&query)
        .with_context(|| format!("Failed to read history of '{}'", query.path))?;

    if json {
        return output::json(&history);
    }

    let verbosity = ctx.verbosity();
    output::print(
        format!("{} ({} commits)", history.scope, history.entries.len()),
        verbosity,
    );
    let abbrev = service.config().abbrev();
    for entry in &history.entries {
        println!("{}", output::format_history_row(entry, abbrev));
    }
    Ok(())
}
