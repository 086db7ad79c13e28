//! Readers and writers sharing one service across threads.

mod common;

use std::sync::Arc;
use std::thread;

use common::*;

use lineage::core::scope::FilterLevel;
use lineage::engine::HistoryError;

#[test]
fn readers_run_alongside_writers() {
    let (repo, ids) = two_projects();
    let service = Arc::new(repo.service());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                for _ in 0..10 {
                    let rows = service
                        .get_filtered_history(&path(PROJ1), FilterLevel::Project)
                        .unwrap();
                    assert_eq!(rows.len(), 3);
                    assert_eq!(rows.last().unwrap().message, "Initial commit");
                }
            })
        })
        .collect();

    for i in 0..10 {
        service
            .create_branch(&format!("branch-{i}"), &ids[i % 3])
            .unwrap();
    }

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(service.list_refs().unwrap().branches.len(), 11);
}

#[test]
fn concurrent_creation_of_one_name_has_one_winner() {
    let (repo, ids) = two_projects();
    let service = Arc::new(repo.service());

    let writers: Vec<_> = (0..4)
        .map(|i| {
            let service = Arc::clone(&service);
            let target = ids[i % 3].clone();
            thread::spawn(move || service.create_branch("contested", &target))
        })
        .collect();

    let results: Vec<_> = writers.into_iter().map(|w| w.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, HistoryError::RefExists { .. })));
}
