use reliakit_store::{LogStatus, LogStore, StoreError};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_insert_assigns_increasing_ids() {
    let temp = TempDir::new().unwrap();
    let store = LogStore::open(temp.path().join("memory.db")).unwrap();

    let first = store
        .insert("EchoLens", "gemini", "p1", "r1", LogStatus::Success)
        .unwrap();
    let second = store
        .insert("EchoLens", "gemini", "p2", "r2", LogStatus::Success)
        .unwrap();

    assert!(second.id > first.id);
    assert!(!first.timestamp.is_empty());
}

#[test]
fn test_empty_agent_name_rejected() {
    let temp = TempDir::new().unwrap();
    let store = LogStore::open(temp.path().join("memory.db")).unwrap();

    let result = store.insert("", "gemini", "p", "r", LogStatus::Success);
    assert!(matches!(result, Err(StoreError::EmptyAgentName)));
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn test_seed_scenario() {
    let temp = TempDir::new().unwrap();
    let store = LogStore::open(temp.path().join("memory.db")).unwrap();

    store
        .insert(
            "EchoLens",
            "gemini-pro",
            "Seed prompt: What is ReliaKit?",
            "ReliaKit is a modular automation framework...",
            LogStatus::Seed,
        )
        .unwrap();

    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(
        store.get_last_used_model().unwrap(),
        Some("gemini-pro".to_string())
    );
}

#[test]
fn test_last_used_model_tracks_latest_insert() {
    let temp = TempDir::new().unwrap();
    let store = LogStore::open(temp.path().join("memory.db")).unwrap();

    assert_eq!(store.get_last_used_model().unwrap(), None);

    for i in 0..5 {
        let model = format!("model-{}", i);
        store
            .insert("Agent", &model, "p", "r", LogStatus::Success)
            .unwrap();
    }

    assert_eq!(
        store.get_last_used_model().unwrap(),
        Some("model-4".to_string())
    );
}

#[test]
fn test_list_all_ordering_and_count() {
    let temp = TempDir::new().unwrap();
    let store = LogStore::open(temp.path().join("memory.db")).unwrap();

    for i in 0..10 {
        store
            .insert("Agent", "m", &format!("p{}", i), "r", LogStatus::Success)
            .unwrap();
    }

    let all = store.list_all().unwrap();
    assert_eq!(all.len() as i64, store.count().unwrap());

    for pair in all.windows(2) {
        assert!(
            (pair[0].timestamp.as_str(), pair[0].id) < (pair[1].timestamp.as_str(), pair[1].id)
        );
    }
}

#[test]
fn test_list_by_status_filters() {
    let temp = TempDir::new().unwrap();
    let store = LogStore::open(temp.path().join("memory.db")).unwrap();

    store.insert("A", "m1", "p", "ok", LogStatus::Success).unwrap();
    store.insert("B", "m2", "p", "ok", LogStatus::Fallback).unwrap();
    store.insert("C", "m3", "p", "err", LogStatus::Error).unwrap();
    store.insert("D", "m3", "p", "err", LogStatus::Error).unwrap();

    let failed = store.list_by_status(LogStatus::Error).unwrap();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].agent_name, "C");
    assert_eq!(failed[1].agent_name, "D");

    let fallback = store.list_by_status(LogStatus::Fallback).unwrap();
    assert_eq!(fallback.len(), 1);
    assert_eq!(fallback[0].model_used, "m2");
}

#[test]
fn test_reopen_is_idempotent_and_shares_state() {
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("memory.db");

    let first = LogStore::open(&db_path).unwrap();
    assert!(!first.has_entries().unwrap());
    first
        .insert("EchoLens", "gemini", "p", "r", LogStatus::Success)
        .unwrap();

    // A second instance against the same file must see the prior insert and
    // must not disturb the schema.
    let second = LogStore::open(&db_path).unwrap();
    assert!(second.has_entries().unwrap());
    assert_eq!(second.count().unwrap(), 1);
    assert_eq!(first.count().unwrap(), 1);
}

#[test]
fn test_concurrent_inserts_keep_rows_whole() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(LogStore::open(temp.path().join("memory.db")).unwrap());

    let mut handles = vec![];
    for i in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let agent = format!("agent{}", i);
            let model = format!("model{}", i);
            store
                .insert(&agent, &model, &format!("p{}", i), &format!("r{}", i), LogStatus::Success)
                .unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let all = store.list_all().unwrap();
    assert_eq!(all.len(), 10);
    for entry in all {
        // Each row's fields must come from a single insert.
        let suffix = entry.agent_name.trim_start_matches("agent").to_string();
        assert_eq!(entry.model_used, format!("model{}", suffix));
        assert_eq!(entry.prompt, format!("p{}", suffix));
        assert_eq!(entry.response, format!("r{}", suffix));
    }
}
