//! Shared fixtures for integration tests.
//!
//! Repositories are built with the real `git` CLI in temporary directories.
//! Commit timestamps advance one minute per commit so history order never
//! depends on wall-clock resolution.

#![allow(dead_code)]

use std::cell::Cell;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use lineage::core::config::Config;
use lineage::core::types::RepoPath;
use lineage::engine::HistoryService;

const EPOCH: i64 = 1_700_000_000;

/// Test fixture that creates a real git repository.
pub struct TestRepo {
    dir: TempDir,
    clock: Cell<i64>,
}

impl TestRepo {
    /// Create an empty repository on branch `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(dir.path(), &["config", "tag.gpgsign", "false"]);
        Self {
            dir,
            clock: Cell::new(EPOCH),
        }
    }

    /// Get the path to the repository.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, path: &str, content: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    /// Stage everything and commit, returning the new commit id.
    pub fn commit_all(&self, message: &str) -> String {
        run_git(self.path(), &["add", "-A"]);
        self.commit_staged(message)
    }

    /// Commit the index as it stands, returning the new commit id.
    pub fn commit_staged(&self, message: &str) -> String {
        let date = format!("@{} +0000", self.clock.get());
        self.clock.set(self.clock.get() + 60);

        let output = Command::new("git")
            .args(["commit", "-q", "-m", message])
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .current_dir(self.path())
            .output()
            .expect("git commit failed");
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        self.rev_parse("HEAD")
    }

    /// Resolve a revision with git directly.
    pub fn rev_parse(&self, rev: &str) -> String {
        run_git(self.path(), &["rev-parse", rev])
    }

    /// A service over this repository with default configuration.
    pub fn service(&self) -> HistoryService {
        HistoryService::with_config(self.path(), Config::default())
            .expect("failed to open service")
    }
}

/// Run a git command in the given directory, returning trimmed stdout.
pub fn run_git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

pub fn path(s: &str) -> RepoPath {
    RepoPath::new(s).unwrap()
}

pub const PROJ1: &str = "GeneralProject";
pub const PROJ2: &str = "JavaProject";
pub const FOLDER: &str = "GeneralProject/folder";
pub const FILE1: &str = "GeneralProject/folder/test.txt";
pub const FILE2: &str = "GeneralProject/folder/test2.txt";
pub const SECOND_FOLDER: &str = "GeneralProject/secondFolder";
pub const ANOTHER: &str = "GeneralProject/secondFolder/another.txt";

/// Two projects and three commits:
///
/// 1. "Initial commit": both project markers, `folder/test.txt`,
///    `folder/test2.txt`
/// 2. "Changed test.txt": edits `folder/test.txt`
/// 3. "A new file in a new folder": adds `secondFolder/another.txt`
///
/// Returns the repository and the commit ids, oldest first.
pub fn two_projects() -> (TestRepo, [String; 3]) {
    let repo = TestRepo::new();
    repo.write("GeneralProject/.project", "<projectDescription/>\n");
    repo.write(FILE1, "Hello, world\n");
    repo.write(FILE2, "Some more content\n");
    repo.write("JavaProject/.project", "<projectDescription/>\n");
    let c1 = repo.commit_all("Initial commit");

    repo.write(FILE1, "Hello, world\nChanged\n");
    let c2 = repo.commit_all("Changed test.txt");

    repo.write(ANOTHER, "New content\n");
    let c3 = repo.commit_all("A new file in a new folder");

    (repo, [c1, c2, c3])
}
