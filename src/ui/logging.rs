//! ui::logging
//!
//! Diagnostic logging on stderr.
//!
//! `RUST_LOG` wins when set. Otherwise the level follows the verbosity
//! flags: `--quiet` shows errors only, `--debug` shows engine debug events,
//! and the default shows warnings.

use tracing_subscriber::EnvFilter;

use super::output::Verbosity;

/// Default filter directive for a verbosity.
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Debug => "lineage=debug,warn",
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_parse() {
        for v in [Verbosity::Quiet, Verbosity::Normal, Verbosity::Debug] {
            assert!(EnvFilter::try_new(default_directive(v)).is_ok());
        }
    }
}
