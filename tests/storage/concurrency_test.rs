//! Concurrent store access tests

use std::collections::HashSet;
use std::sync::Arc;

use super::new_entry;
use ledger_server::storage::SqliteStore;
use ledger_server::traits::{AttachOutcome, EntryStore, LogProof};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_get_unique_ids() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::new(dir.path().join("ledger.db")).unwrap();
    store.initialize().unwrap();
    let store = Arc::new(store);

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let payload = format!("payload-{}", i);
            store
                .create_entry(new_entry(&format!("doc-{}", i), payload.as_bytes()).await)
                .await
                .unwrap()
                .id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await.unwrap()));
    }
    assert_eq!(ids.len(), 32);

    let listed = store.list_recent(100).await.unwrap();
    assert_eq!(listed.len(), 32);
    assert!(listed.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_identical_attach_writes_once() {
    let store = SqliteStore::in_memory().unwrap();
    store.initialize().unwrap();
    let store = Arc::new(store);

    let entry = store.create_entry(new_entry("doc", b"x").await).await.unwrap();
    let proof = LogProof {
        log_id: "24296fb24b8ad77a".into(),
        log_index: 3,
    };

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = Arc::clone(&store);
        let proof = proof.clone();
        handles.push(tokio::spawn(async move {
            store.attach_anchor_proof(entry.id, &proof).await.unwrap()
        }));
    }

    let mut attached = 0;
    for handle in handles {
        if handle.await.unwrap() == AttachOutcome::Attached {
            attached += 1;
        }
    }
    assert_eq!(attached, 1);

    let stored = store.get_entry(entry.id).await.unwrap().unwrap();
    assert_eq!(stored.anchor.unwrap().log_index, 3);
}
