//! Integration tests for branch and tag creation.

mod common;

use common::*;

use lineage::core::lock::RepoLock;
use lineage::core::scope::FilterLevel;
use lineage::engine::{HistoryError, RefKind};

#[test]
fn create_branch_at_history_row() {
    let (repo, _) = two_projects();
    let service = repo.service();
    let rows = service
        .get_filtered_history(&path(PROJ1), FilterLevel::None)
        .unwrap();
    let target = rows[1].commit_id.clone();

    let created = service.create_branch("NewBranch", target.as_str()).unwrap();
    assert_eq!(created.name.as_str(), "refs/heads/NewBranch");
    assert_eq!(created.kind, RefKind::Branch);
    assert_eq!(created.target, target);

    assert_eq!(service.resolve("refs/heads/NewBranch").unwrap(), target);
    assert_eq!(repo.rev_parse("NewBranch"), target.as_str());
}

#[test]
fn duplicate_branch_rejected_without_change() {
    let (repo, ids) = two_projects();
    let service = repo.service();
    service.create_branch("NewBranch", &ids[0]).unwrap();

    let err = service.create_branch("NewBranch", &ids[2]).unwrap_err();
    assert!(matches!(err, HistoryError::RefExists { .. }));
    assert_eq!(repo.rev_parse("NewBranch"), ids[0]);
}

#[test]
fn branch_target_may_be_abbreviated_or_a_ref() {
    let (repo, ids) = two_projects();
    let service = repo.service();

    let short = service.create_branch("from-short", &ids[1][..8]).unwrap();
    assert_eq!(short.target.as_str(), ids[1]);

    let from_ref = service.create_branch("from-main", "main").unwrap();
    assert_eq!(from_ref.target.as_str(), ids[2]);
}

#[test]
fn unknown_target_rejected() {
    let (repo, _) = two_projects();
    let service = repo.service();

    let err = service
        .create_branch("NewBranch", "0123456789abcdef0123456789abcdef01234567")
        .unwrap_err();
    assert!(matches!(err, HistoryError::TargetNotFound { .. }));

    let err = service.create_tag("NewTag", "nowhere", None).unwrap_err();
    assert!(matches!(err, HistoryError::TargetNotFound { .. }));
    assert!(service.resolve("refs/heads/NewBranch").is_err());
}

#[test]
fn invalid_names_rejected() {
    let (repo, ids) = two_projects();
    let service = repo.service();
    for name in ["has space", "a..b", "-flag", "ends.lock", ""] {
        let err = service.create_branch(name, &ids[0]).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidName { .. }), "{name:?}");
    }
}

#[test]
fn lightweight_tag() {
    let (repo, ids) = two_projects();
    let service = repo.service();

    let tag = service.create_tag("NewTag", &ids[0], None).unwrap();
    assert_eq!(tag.name.as_str(), "refs/tags/NewTag");
    assert_eq!(tag.kind, RefKind::Tag);
    assert!(tag.annotation.is_none());
    assert_eq!(service.resolve("refs/tags/NewTag").unwrap().as_str(), ids[0]);
    assert_eq!(run_git(repo.path(), &["cat-file", "-t", "NewTag"]), "commit");
}

#[test]
fn annotated_tag_peels_to_commit() {
    let (repo, ids) = two_projects();
    let service = repo.service();

    let tag = service
        .create_tag("v1.0", &ids[1], Some("First release"))
        .unwrap();
    let annotation = tag.annotation.expect("annotated");
    assert_eq!(annotation.message, "First release");
    assert_eq!(run_git(repo.path(), &["cat-file", "-t", "v1.0"]), "tag");
    assert_eq!(service.resolve("refs/tags/v1.0").unwrap().as_str(), ids[1]);

    let listing = service.list_refs().unwrap();
    let listed = listing
        .tags
        .iter()
        .find(|t| t.short_name() == "v1.0")
        .unwrap();
    assert_eq!(listed.target.as_str(), ids[1]);
    assert!(listed
        .annotation
        .as_ref()
        .is_some_and(|a| a.message.starts_with("First release")));
}

#[test]
fn duplicate_tag_rejected() {
    let (repo, ids) = two_projects();
    let service = repo.service();
    service.create_tag("NewTag", &ids[0], None).unwrap();

    let err = service.create_tag("NewTag", &ids[1], Some("again")).unwrap_err();
    assert!(matches!(err, HistoryError::RefExists { .. }));
    assert_eq!(repo.rev_parse("NewTag"), ids[0]);
}

#[test]
fn branch_and_tag_namespaces_are_separate() {
    let (repo, ids) = two_projects();
    let service = repo.service();
    service.create_branch("release", &ids[0]).unwrap();
    service.create_tag("release", &ids[1], None).unwrap();

    assert_eq!(service.resolve("refs/heads/release").unwrap().as_str(), ids[0]);
    assert_eq!(service.resolve("refs/tags/release").unwrap().as_str(), ids[1]);
}

#[test]
fn listing_is_sorted() {
    let (repo, ids) = two_projects();
    let service = repo.service();
    service.create_branch("zeta", &ids[0]).unwrap();
    service.create_branch("alpha", &ids[1]).unwrap();

    let names: Vec<String> = service
        .list_refs()
        .unwrap()
        .branches
        .iter()
        .map(|b| b.short_name().to_string())
        .collect();
    assert_eq!(names, ["alpha", "main", "zeta"]);
}

#[test]
fn resolve_unknown_ref_not_found() {
    let (repo, _) = two_projects();
    let err = repo.service().resolve("refs/heads/nope").unwrap_err();
    assert!(matches!(err, HistoryError::NotFound { .. }));
}

#[test]
fn held_lock_blocks_writers_not_readers() {
    let (repo, ids) = two_projects();
    let service = repo.service();
    let _held = RepoLock::acquire(service.paths()).unwrap();

    let err = service.create_branch("NewBranch", &ids[0]).unwrap_err();
    assert!(matches!(err, HistoryError::Locked { .. }));
    assert_eq!(
        service
            .get_filtered_history(&path(PROJ1), FilterLevel::None)
            .unwrap()
            .len(),
        3
    );
}
