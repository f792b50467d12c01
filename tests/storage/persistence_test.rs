//! Durability and hash-only storage tests

use super::new_entry;
use ledger_server::error::StorageError;
use ledger_server::storage::SqliteStore;
use ledger_server::traits::{AttachOutcome, EntryStore, LogProof};

fn open(path: &std::path::Path) -> SqliteStore {
    let store = SqliteStore::new(path).expect("Failed to open database");
    store.initialize().expect("Failed to initialize storage");
    store
}

#[tokio::test]
async fn test_entries_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let (first, proof) = {
        let store = open(&path);
        let first = store.create_entry(new_entry("doc-1", b"one").await).await.unwrap();
        store.create_entry(new_entry("doc-2", b"two").await).await.unwrap();

        let proof = LogProof {
            log_id: "24296fb24b8ad77a".into(),
            log_index: 11,
        };
        assert_eq!(
            store.attach_anchor_proof(first.id, &proof).await.unwrap(),
            AttachOutcome::Attached
        );
        (first, proof)
    };

    let store = open(&path);
    assert_eq!(store.schema_version().unwrap(), Some(1));

    let entries = store.list_recent(10).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].id, first.id);
    assert_eq!(entries[1].payload_hash, first.payload_hash);
    assert_eq!(entries[1].signature, first.signature);

    let anchor = entries[1].anchor.as_ref().unwrap();
    assert_eq!(anchor.log_id, proof.log_id);
    assert_eq!(anchor.log_index, proof.log_index);
    assert!(entries[0].anchor.is_none());
}

#[tokio::test]
async fn test_ids_keep_increasing_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let last = {
        let store = open(&path);
        store.create_entry(new_entry("a", b"a").await).await.unwrap();
        store.create_entry(new_entry("b", b"b").await).await.unwrap()
    };

    let store = open(&path);
    let next = store.create_entry(new_entry("c", b"c").await).await.unwrap();
    assert!(next.id > last.id);
}

#[tokio::test]
async fn test_conflicting_proof_rejected_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");

    let id = {
        let store = open(&path);
        let entry = store.create_entry(new_entry("doc", b"x").await).await.unwrap();
        store
            .attach_anchor_proof(
                entry.id,
                &LogProof {
                    log_id: "first".into(),
                    log_index: 1,
                },
            )
            .await
            .unwrap();
        entry.id
    };

    let store = open(&path);
    let err = store
        .attach_anchor_proof(
            id,
            &LogProof {
                log_id: "second".into(),
                log_index: 2,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::AnchorConflict { .. }));

    let entry = store.get_entry(id).await.unwrap().unwrap();
    assert_eq!(entry.anchor.unwrap().log_id, "first");
}

#[tokio::test]
async fn test_payload_bytes_never_stored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let secret = b"very-secret-payload-marker-2f9c";

    {
        let store = open(&path);
        store
            .create_entry(new_entry("doc", secret).await)
            .await
            .unwrap();
    }

    // Checkpoint the WAL so everything lands in the main file
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
            .unwrap();
    }

    let bytes = std::fs::read(&path).unwrap();
    let found = bytes.windows(secret.len()).any(|w| w == secret);
    assert!(!found, "raw payload must not be persisted");
}

#[tokio::test]
async fn test_file_database_uses_wal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.db");
    let _store = open(&path);

    let conn = rusqlite::Connection::open(&path).unwrap();
    let mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(mode.to_lowercase(), "wal");
}
