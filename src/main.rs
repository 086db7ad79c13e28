//! lineage binary entry point.

use std::process::ExitCode;

use lineage::ui::output;

fn main() -> ExitCode {
    match lineage::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}
