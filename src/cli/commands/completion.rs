//! completion command - Print a shell completion script

use std::io::Write;

use crate::cli::args::{Cli, Shell};
use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, shells};

/// Print the completion script for `shell` on stdout.
pub fn completion(shell: Shell) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_script(shell, &mut out);
    out.flush()?;
    Ok(())
}

fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, bin, out),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, bin, out),
        Shell::Fish => generate(shells::Fish, &mut cmd, bin, out),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, bin, out),
    }
}
