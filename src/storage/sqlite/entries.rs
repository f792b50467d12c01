// File: src/storage/sqlite/entries.rs

use super::convert::{row_to_entry, ENTRY_COLUMNS};
use crate::error::StorageError;
use crate::traits::{AttachOutcome, EntryId, LedgerEntry, LogProof, NewEntry};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

/// Insert a new entry and read it back, in one IMMEDIATE transaction
pub(crate) fn insert_entry(
    conn: &mut Connection,
    entry: &NewEntry,
) -> Result<LedgerEntry, StorageError> {
    let metadata = serde_json::to_string(&entry.metadata)
        .map_err(|e| StorageError::TransactionFailed(format!("metadata encode: {}", e)))?;
    let created_at = Utc::now().timestamp_nanos_opt().unwrap_or(0);

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    tx.execute(
        "INSERT INTO ledger_entries (subject, payload_hash, signature, public_key, metadata, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            entry.subject,
            entry.payload_hash,
            entry.signature.signature_base64(),
            entry.signature.public_key(),
            metadata,
            created_at,
        ],
    )?;
    let id = tx.last_insert_rowid();

    let stored = select_entry(&tx, id)?.ok_or_else(|| {
        StorageError::Corruption(format!("entry {} missing right after insert", id))
    })?;

    tx.commit()?;
    Ok(stored)
}

/// Attach an anchor proof, or confirm the identical one is already there
pub(crate) fn attach_proof(
    conn: &mut Connection,
    id: EntryId,
    proof: &LogProof,
) -> Result<AttachOutcome, StorageError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing: Option<(Option<String>, Option<i64>)> = tx
        .query_row(
            "SELECT anchor_log_id, anchor_index FROM ledger_entries WHERE id = ?1",
            params![id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match existing {
        None => Err(StorageError::NotFound(format!("entry {}", id))),
        Some((Some(log_id), Some(log_index))) => {
            if log_id == proof.log_id && log_index == proof.log_index {
                Ok(AttachOutcome::AlreadyAttached)
            } else {
                Err(StorageError::AnchorConflict {
                    id,
                    existing_log_id: log_id,
                    existing_index: log_index,
                })
            }
        }
        Some((None, None)) => {
            let anchored_at = Utc::now().timestamp_nanos_opt().unwrap_or(0);
            let updated = tx.execute(
                "UPDATE ledger_entries
                 SET anchor_log_id = ?1, anchor_index = ?2, anchored_at = ?3
                 WHERE id = ?4 AND anchored_at IS NULL",
                params![proof.log_id, proof.log_index, anchored_at, id],
            )?;
            if updated != 1 {
                return Err(StorageError::TransactionFailed(format!(
                    "anchor update touched {} rows for entry {}",
                    updated, id
                )));
            }
            tx.commit()?;
            Ok(AttachOutcome::Attached)
        }
        Some(_) => Err(StorageError::Corruption(format!(
            "entry {} has a partial anchor proof",
            id
        ))),
    }
}

/// Fetch one entry by id
pub(crate) fn select_entry(
    conn: &Connection,
    id: EntryId,
) -> Result<Option<LedgerEntry>, StorageError> {
    let sql = format!("SELECT {} FROM ledger_entries WHERE id = ?1", ENTRY_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_entry).optional()?)
}

/// Newest entries first
pub(crate) fn select_recent(
    conn: &Connection,
    limit: usize,
) -> Result<Vec<LedgerEntry>, StorageError> {
    let sql = format!(
        "SELECT {} FROM ledger_entries ORDER BY id DESC LIMIT ?1",
        ENTRY_COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![limit as i64], row_to_entry)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Unanchored entries created before the cutoff with id above `after_id`,
/// oldest first
pub(crate) fn select_unanchored(
    conn: &Connection,
    created_before: DateTime<Utc>,
    after_id: EntryId,
    limit: usize,
) -> Result<Vec<LedgerEntry>, StorageError> {
    let cutoff = created_before.timestamp_nanos_opt().unwrap_or(i64::MAX);
    let sql = format!(
        "SELECT {} FROM ledger_entries
         WHERE anchored_at IS NULL AND created_at < ?1 AND id > ?2
         ORDER BY id ASC LIMIT ?3",
        ENTRY_COLUMNS
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![cutoff, after_id, limit as i64], row_to_entry)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}
