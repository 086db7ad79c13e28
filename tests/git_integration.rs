//! Integration tests for the Git interface.
//!
//! These tests use real git repositories created via tempfile to verify
//! that the Git interface works correctly with actual git operations.

mod common;

use common::*;
use tempfile::TempDir;

use lineage::core::commit::TreeEntry;
use lineage::core::types::{Oid, RefName};
use lineage::git::{Git, GitError, GitState};

/// A repository with one commit of `README.md`.
fn repo_with_readme() -> (TestRepo, Oid) {
    let repo = TestRepo::new();
    repo.write("README.md", "# Test Repo\n");
    let head = repo.commit_all("Initial commit");
    (repo, Oid::new(head).unwrap())
}

fn git(repo: &TestRepo) -> Git {
    Git::open(repo.path()).expect("failed to open test repo")
}

// =============================================================================
// Repository Opening Tests
// =============================================================================

#[test]
fn open_valid_repository() {
    let (repo, _) = repo_with_readme();
    assert!(Git::open(repo.path()).is_ok());
}

#[test]
fn open_from_subdirectory() {
    let (repo, _) = repo_with_readme();
    let subdir = repo.path().join("subdir");
    std::fs::create_dir(&subdir).unwrap();
    assert!(Git::open(&subdir).is_ok());
}

#[test]
fn open_non_repository_fails() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(Git::open(dir.path()), Err(GitError::NotARepo { .. })));
}

#[test]
fn open_bare_repository_fails() {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "-q", "--bare"]);
    assert!(matches!(Git::open(dir.path()), Err(GitError::BareRepo)));
}

#[test]
fn repo_info() {
    let (repo, _) = repo_with_readme();
    let info = git(&repo).info().unwrap();
    assert!(info.git_dir.ends_with(".git"));
    assert_eq!(info.git_dir, info.common_dir);
    assert_eq!(
        info.work_dir.canonicalize().unwrap(),
        repo.path().canonicalize().unwrap()
    );
}

// =============================================================================
// Ref Resolution Tests
// =============================================================================

#[test]
fn head_oid_matches_git() {
    let (repo, head) = repo_with_readme();
    assert_eq!(git(&repo).head_oid().unwrap(), head);
}

#[test]
fn head_oid_unborn_is_ref_not_found() {
    let repo = TestRepo::new();
    assert!(matches!(
        git(&repo).head_oid(),
        Err(GitError::RefNotFound { .. })
    ));
    assert_eq!(git(&repo).current_branch().unwrap(), None);
}

#[test]
fn resolve_ref_branch() {
    let (repo, head) = repo_with_readme();
    assert_eq!(git(&repo).resolve_ref("refs/heads/main").unwrap(), head);
    assert!(matches!(
        git(&repo).resolve_ref("refs/heads/missing"),
        Err(GitError::RefNotFound { .. })
    ));
    assert_eq!(git(&repo).try_resolve_ref("refs/heads/missing").unwrap(), None);
}

#[test]
fn try_resolve_commit_accepts_revisions() {
    let (repo, head) = repo_with_readme();
    let git = git(&repo);
    assert_eq!(git.try_resolve_commit("main").unwrap(), Some(head.clone()));
    assert_eq!(git.try_resolve_commit("HEAD").unwrap(), Some(head.clone()));
    assert_eq!(git.try_resolve_commit(head.short(7)).unwrap(), Some(head));
    assert_eq!(git.try_resolve_commit("nope").unwrap(), None);
}

#[test]
fn try_resolve_commit_peels_annotated_tags() {
    let (repo, head) = repo_with_readme();
    run_git(repo.path(), &["tag", "-a", "v1", "-m", "release"]);
    assert_eq!(git(&repo).try_resolve_commit("v1").unwrap(), Some(head));
}

#[test]
fn current_branch_returns_checked_out() {
    let (repo, _) = repo_with_readme();
    run_git(repo.path(), &["checkout", "-q", "-b", "feature"]);
    let branch = git(&repo).current_branch().unwrap().unwrap();
    assert_eq!(branch.as_str(), "feature");

    run_git(repo.path(), &["checkout", "-q", "--detach"]);
    assert_eq!(git(&repo).current_branch().unwrap(), None);
}

#[test]
fn list_refs_by_prefix_sorted_with_tag_objects() {
    let (repo, head) = repo_with_readme();
    run_git(repo.path(), &["branch", "zeta"]);
    run_git(repo.path(), &["branch", "alpha"]);
    run_git(repo.path(), &["tag", "light"]);
    run_git(repo.path(), &["tag", "-a", "heavy", "-m", "annotated"]);

    let git = git(&repo);
    let branches: Vec<String> = git
        .list_refs_by_prefix(RefName::HEADS)
        .unwrap()
        .into_iter()
        .map(|r| r.name.to_string())
        .collect();
    assert_eq!(
        branches,
        ["refs/heads/alpha", "refs/heads/main", "refs/heads/zeta"]
    );

    let tags = git.list_refs_by_prefix(RefName::TAGS).unwrap();
    assert_eq!(tags.len(), 2);
    assert!(tags.iter().all(|t| t.oid == head));
    let heavy = tags.iter().find(|t| t.name.as_str() == "refs/tags/heavy").unwrap();
    let light = tags.iter().find(|t| t.name.as_str() == "refs/tags/light").unwrap();
    assert!(heavy.tag_object.is_some());
    assert!(light.tag_object.is_none());
    assert!(git
        .tag_message(heavy.tag_object.as_ref().unwrap())
        .unwrap()
        .starts_with("annotated"));
}

// =============================================================================
// Ref Creation Tests
// =============================================================================

#[test]
fn create_ref_never_overwrites() {
    let (repo, head) = repo_with_readme();
    let git = git(&repo);
    let refname = RefName::new("refs/heads/created").unwrap();

    git.create_ref(&refname, &head, "test").unwrap();
    assert!(git.ref_exists("refs/heads/created"));
    assert!(matches!(
        git.create_ref(&refname, &head, "again"),
        Err(GitError::RefExists { .. })
    ));
}

#[test]
fn create_ref_missing_target() {
    let (repo, _) = repo_with_readme();
    let missing = Oid::new("0123456789abcdef0123456789abcdef01234567").unwrap();
    let err = git(&repo)
        .create_ref(&RefName::new("refs/heads/x").unwrap(), &missing, "test")
        .unwrap_err();
    assert!(matches!(err, GitError::ObjectNotFound { .. }));
}

#[test]
fn create_annotated_tag_object() {
    let (repo, head) = repo_with_readme();
    let git = git(&repo);
    let tag = git.create_annotated_tag("v2", &head, "second").unwrap();
    assert_ne!(tag, head);
    assert_eq!(git.resolve_ref("refs/tags/v2").unwrap(), head);
    assert_eq!(run_git(repo.path(), &["cat-file", "-t", tag.as_str()]), "tag");
}

// =============================================================================
// Commit and Tree Tests
// =============================================================================

#[test]
fn commit_returns_correct_data() {
    let (repo, root) = repo_with_readme();
    repo.write("README.md", "# Changed\n");
    let second = Oid::new(repo.commit_all("Second commit\n\nWith a body")).unwrap();

    let commit = git(&repo).commit(&second).unwrap();
    assert_eq!(commit.id, second);
    assert_eq!(commit.parents, vec![root.clone()]);
    assert_eq!(commit.author_name, "Test User");
    assert_eq!(commit.author_email, "test@example.com");
    assert_eq!(commit.summary(), "Second commit");
    assert!(commit.time > git(&repo).commit(&root).unwrap().time);

    assert!(git(&repo).commit(&root).unwrap().is_root());
}

#[test]
fn commit_missing_is_object_not_found() {
    let (repo, _) = repo_with_readme();
    let missing = Oid::new("0123456789abcdef0123456789abcdef01234567").unwrap();
    assert!(matches!(
        git(&repo).commit(&missing),
        Err(GitError::ObjectNotFound { .. })
    ));
}

#[test]
fn tree_entries_for_files_and_directories() {
    let repo = TestRepo::new();
    repo.write("dir/sub/file.txt", "content\n");
    let head = Oid::new(repo.commit_all("init")).unwrap();
    let git = git(&repo);
    let tree = git.commit(&head).unwrap().tree;

    let file = git.tree_entry(&tree, &path("dir/sub/file.txt")).unwrap().unwrap();
    assert!(!file.is_dir);
    assert_eq!(file.mode, TreeEntry::FILE_MODE);
    assert_eq!(
        file.id.as_str(),
        run_git(repo.path(), &["rev-parse", "HEAD:dir/sub/file.txt"])
    );

    let dir = git.tree_entry(&tree, &path("dir")).unwrap().unwrap();
    assert!(dir.is_dir);
    assert_eq!(dir.mode, TreeEntry::DIR_MODE);
    assert_eq!(dir.id.as_str(), run_git(repo.path(), &["rev-parse", "HEAD:dir"]));

    assert!(git.tree_entry(&tree, &path("dir/nope")).unwrap().is_none());
    assert_eq!(
        git.tree_entry(&tree, &lineage::core::types::RepoPath::root())
            .unwrap()
            .unwrap()
            .id,
        tree
    );
}

#[test]
fn tree_entry_reports_executable_mode() {
    let repo = TestRepo::new();
    repo.write("run.sh", "echo hi\n");
    let before = Oid::new(repo.commit_all("init")).unwrap();
    run_git(repo.path(), &["update-index", "--chmod=+x", "run.sh"]);
    let after = Oid::new(repo.commit_staged("chmod")).unwrap();

    let git = git(&repo);
    let entry = |commit: &Oid| {
        let tree = git.commit(commit).unwrap().tree;
        git.tree_entry(&tree, &path("run.sh")).unwrap().unwrap()
    };
    let (old, new) = (entry(&before), entry(&after));
    assert_eq!(old.id, new.id);
    assert_eq!(old.mode, 0o100644);
    assert_eq!(new.mode, 0o100755);
    assert_ne!(old, new);
}

// =============================================================================
// State and Status Tests
// =============================================================================

#[test]
fn clean_state_when_no_operation() {
    let (repo, _) = repo_with_readme();
    assert_eq!(git(&repo).state(), GitState::Clean);
}

#[test]
fn worktree_status_counts() {
    let (repo, _) = repo_with_readme();
    assert!(git(&repo).worktree_status(true).unwrap().is_clean());

    repo.write("README.md", "edited\n");
    repo.write("new.txt", "new\n");
    repo.write("staged.txt", "staged\n");
    run_git(repo.path(), &["add", "staged.txt"]);

    let status = git(&repo).worktree_status(true).unwrap();
    assert_eq!(status.unstaged, 1);
    assert_eq!(status.staged, 1);
    assert_eq!(status.untracked, 1);
    assert!(!status.is_clean());

    let without_untracked = git(&repo).worktree_status(false).unwrap();
    assert_eq!(without_untracked.untracked, 0);
}

// =============================================================================
// Checkout Tests
// =============================================================================

#[test]
fn checkout_tree_then_detach() {
    let (repo, root) = repo_with_readme();
    repo.write("README.md", "# Changed\n");
    repo.commit_all("Second");

    let git = git(&repo);
    git.checkout_tree(&root).unwrap();
    git.set_head_detached(&root).unwrap();

    assert_eq!(git.head_oid().unwrap(), root);
    assert_eq!(git.current_branch().unwrap(), None);
    assert_eq!(
        std::fs::read_to_string(repo.path().join("README.md")).unwrap(),
        "# Test Repo\n"
    );
    assert!(git.worktree_status(false).unwrap().is_clean());

    git.set_head(&RefName::new("refs/heads/main").unwrap()).unwrap();
    assert_eq!(git.current_branch().unwrap().unwrap().as_str(), "main");
}

#[test]
fn restore_tree_undoes_checkout_tree() {
    let (repo, root) = repo_with_readme();
    repo.write("README.md", "# Changed\n");
    repo.write("docs/guide.md", "guide\n");
    let second = Oid::new(repo.commit_all("Second")).unwrap();

    let git = git(&repo);
    git.checkout_tree(&root).unwrap();
    assert!(!repo.path().join("docs/guide.md").exists());
    assert!(!git.worktree_status(false).unwrap().is_clean());

    // HEAD never moved, so the tree goes back to the commit it names.
    git.restore_tree(&second).unwrap();
    assert_eq!(git.head_oid().unwrap(), second);
    assert_eq!(
        std::fs::read_to_string(repo.path().join("README.md")).unwrap(),
        "# Changed\n"
    );
    assert!(repo.path().join("docs/guide.md").exists());
    assert!(git.worktree_status(false).unwrap().is_clean());
}
