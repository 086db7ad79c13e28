//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::scope::FilterLevel;

/// Lineage - scoped commit history, branches, tags and checkout
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if lineage was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the commits that touch a file, folder or project
    #[command(
        name = "log",
        long_about = "Show the commits that touch a file, folder or project.\n\n\
            The selected path is classified as a project (a directory holding a \
            project marker such as .project), a folder, or a file. The filter level \
            then picks the scope: the selection itself, the whole repository, the \
            owning project, or the containing folder. Rows are listed newest first.",
        after_help = "\
WORKFLOW EXAMPLES:
    # History of one file
    lineage log GeneralProject/folder/test.txt

    # Everything in the project that owns a file
    lineage log GeneralProject/folder/test.txt --filter project

    # Everything in the folder containing a file, from another branch
    lineage log GeneralProject/folder/test.txt --filter folder --rev NewBranch

    # Machine-readable output
    lineage log GeneralProject --json"
    )]
    Log {
        /// File, folder or project to show history for (default: current directory)
        path: Option<PathBuf>,

        /// Filter level: none, repository, project, folder
        #[arg(long, short = 'f', value_parser = parse_filter)]
        filter: Option<FilterLevel>,

        /// Revision to start from (default: HEAD)
        #[arg(long)]
        rev: Option<String>,

        /// Show at most this many rows
        #[arg(long = "max-count", short = 'n')]
        max_count: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a branch at a commit
    #[command(
        name = "branch",
        after_help = "\
WORKFLOW EXAMPLES:
    # Branch at a commit id
    lineage branch NewBranch 3f9c2e1

    # Branch at whatever another ref points to
    lineage branch hotfix v1.0"
    )]
    Branch {
        /// New branch name
        name: String,

        /// Commit, branch or tag to point at
        commit: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a tag at a commit
    #[command(
        name = "tag",
        after_help = "\
WORKFLOW EXAMPLES:
    # Lightweight tag
    lineage tag NewTag 3f9c2e1

    # Annotated tag
    lineage tag v1.0 main -m \"First release\""
    )]
    Tag {
        /// New tag name
        name: String,

        /// Commit, branch or tag to point at
        commit: String,

        /// Create an annotated tag with this message
        #[arg(long, short = 'm')]
        message: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check out a branch or commit
    #[command(
        name = "checkout",
        long_about = "Check out a branch or commit.\n\n\
            A branch name attaches HEAD to that branch. A commit that is the tip of a \
            branch attaches to that branch; any other commit detaches HEAD. The working \
            tree must be clean: no staged or unstaged changes to tracked files and no \
            operation in progress. Untracked files are left alone."
    )]
    Checkout {
        /// Branch name or commit
        target: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show where HEAD points
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List branches and tags
    Refs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for lineage commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    lineage completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    lineage completion zsh >> ~/.zshrc

    # Fish
    lineage completion fish > ~/.config/fish/completions/lineage.fish

    # PowerShell
    lineage completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

fn parse_filter(s: &str) -> Result<FilterLevel, String> {
    s.parse()
}
